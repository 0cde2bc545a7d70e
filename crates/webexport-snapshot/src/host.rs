//! The rendering engine seam.

use webexport_dom::{ComputedStyle, Node};

use crate::error::CanvasError;

/// What the snapshot builder needs from the live renderer.
///
/// Both calls receive nodes of the *source* tree, as described from the page.
pub trait RenderHost {
    /// `getComputedStyle(node)`, or `None` if the node is not rendered
    fn computed_style(&self, node: &Node) -> Option<ComputedStyle>;

    /// `canvas.toDataURL("image/png")`
    fn canvas_data_url(&self, canvas: &Node) -> Result<String, CanvasError>;
}

impl<T: RenderHost + ?Sized> RenderHost for &T {
    fn computed_style(&self, node: &Node) -> Option<ComputedStyle> {
        (**self).computed_style(node)
    }

    fn canvas_data_url(&self, canvas: &Node) -> Result<String, CanvasError> {
        (**self).canvas_data_url(canvas)
    }
}

/// A host without a renderer, for offline documents: nothing has a computed
/// style and no canvas can be rasterized.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRenderHost;

impl RenderHost for StaticRenderHost {
    fn computed_style(&self, _node: &Node) -> Option<ComputedStyle> {
        None
    }

    fn canvas_data_url(&self, _canvas: &Node) -> Result<String, CanvasError> {
        Err(CanvasError::Unavailable)
    }
}
