//! Error types for snapshot building.

/// Error type for snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Source and clone enumerate to different element counts. A pure deep clone
    /// can never do this, so the positional mapping would be corrupt.
    #[error("traversal mismatch: source has {source_count} elements, clone has {clone_count}")]
    TraversalMismatch {
        source_count: usize,
        clone_count: usize,
    },

    #[error("no targets to snapshot")]
    NoTargets,
}

/// Why a canvas could not be rasterized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// Cross-origin content was drawn into the canvas
    #[error("canvas is tainted by cross-origin data")]
    Tainted,

    #[error("canvas rasterization unavailable")]
    Unavailable,

    #[error("canvas encoding failed: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
