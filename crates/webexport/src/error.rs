//! Error types for export operations.

use webexport_snapshot::SnapshotError;

/// Failures reported by the page, browser or extension environment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// A browser interface the operation needs is missing
    #[error("{0} unavailable")]
    Unavailable(String),

    /// The host page refused the operation
    #[error("blocked by host page: {0}")]
    Blocked(String),

    #[error("{0}")]
    Failed(String),
}

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("unable to open the print window")]
    PopupBlocked,

    #[error("screenshot capture failed: {0}")]
    Capture(String),

    #[error("invalid capture data: {0}")]
    CaptureData(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("target is outside the visible viewport")]
    NotVisible,

    #[error("no targets to export")]
    NoTargets,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
