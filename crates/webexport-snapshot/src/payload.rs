//! Standalone print payload for hosting a snapshot in another document.

use webexport_dom::Node;

/// Body rules when the snapshot carries its own inline styles
pub const BODY_STYLE_PRESERVED: &str = "margin:0;padding:16px;background:#ffffff;";

/// Body rules when presentation was stripped
pub const BODY_STYLE_PLAIN: &str =
    "margin:0;padding:16px;font-family:Arial, sans-serif;background:#ffffff;";

/// A snapshot plus what a fresh document needs to render it like the page did
#[derive(Debug, Clone)]
pub struct PrintPayload {
    pub clone: Node,
    /// Base URL of the original page, for relative links and images
    pub base_href: String,
    pub body_style: String,
}

impl PrintPayload {
    pub fn new(clone: Node, base_href: &str, preserve_styles: bool) -> Self {
        let body_style = if preserve_styles {
            BODY_STYLE_PRESERVED
        } else {
            BODY_STYLE_PLAIN
        };
        Self {
            clone,
            base_href: base_href.to_string(),
            body_style: body_style.to_string(),
        }
    }
}
