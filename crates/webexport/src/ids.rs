//! Fixed identifiers of everything the exporter adds to a page.
//!
//! Cleanup finds stale artifacts by these ids, so they must stay stable.

pub const HIGHLIGHT_CLASS: &str = "__web_exporter_highlight__";
pub const SELECTED_CLASS: &str = "__web_exporter_selected__";
pub const OVERLAY_ID: &str = "__web_exporter_overlay__";
pub const STYLE_ID: &str = "__web_exporter_style__";
pub const PRINT_CONTAINER_ID: &str = "__web_exporter_print_container__";
pub const PRINT_STYLE_ID: &str = "__web_exporter_print_style__";
