//! The page the exporter runs in.

use std::fmt;

use webexport_dom::Node;
use webexport_snapshot::RenderHost;

use crate::error::HostError;

/// A file handed to the browser's download machinery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(filename: impl Into<String>, mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.to_string(),
            bytes,
        }
    }
}

/// Access to the live document.
///
/// `Element` is the host's handle on a live element. Handles are compared for
/// identity, so two handles are equal only if they refer to the same element.
/// Computed styles and canvas pixels come from the [`RenderHost`] supertrait, keyed
/// by the nodes [`PageHost::describe`] returns.
pub trait PageHost: RenderHost {
    type Element: Clone + PartialEq + fmt::Debug;

    fn title(&self) -> String;

    /// `document.baseURI`, falling back to the page location
    fn base_uri(&self) -> String;

    /// Read the live subtree under `element` into an owned tree, live IDL state
    /// included.
    fn describe(&self, element: &Self::Element) -> Node;

    fn download(&self, download: Download) -> Result<(), HostError>;

    /// Native, blocking alert
    fn alert(&self, message: &str);
}
