//! # webexport-snapshot
//!
//! Build a presentation-frozen, detached copy of a picked DOM subtree.
//!
//! The copy can be mounted anywhere (an overlay in the same page, or a blank
//! document in a new window) and still look like the original:
//!
//! - scripts and inline event handlers are always removed
//! - computed styles are optionally inlined, or presentation stripped
//! - images are pinned to the source they currently display
//! - canvases become `<img>` elements holding their pixels
//! - live form values are written into static attributes
//!
//! ## Example
//!
//! ```rust
//! use webexport_dom::{LiveState, Node};
//! use webexport_snapshot::{build_snapshot, SnapshotOptions, StaticRenderHost};
//!
//! let input = Node::element("input").with_state(LiveState {
//!     value: Some("typed".to_string()),
//!     ..Default::default()
//! });
//! let form = Node::element_with_attrs("form", vec![("onsubmit", "send()")]).with_child(input);
//!
//! let snapshot = build_snapshot(&form, &StaticRenderHost, &SnapshotOptions::default()).unwrap();
//! assert_eq!(snapshot.outer_html(), "<form><input value=\"typed\"></form>");
//! ```

mod builder;
mod error;
pub mod forms;
mod host;
pub mod images;
mod options;
mod payload;

pub use builder::{
    build_selection_snapshot, build_snapshot, strip_event_handlers, strip_presentation,
    MULTI_TARGET_GAP,
};
pub use error::{CanvasError, Result, SnapshotError};
pub use host::{RenderHost, StaticRenderHost};
pub use options::SnapshotOptions;
pub use payload::{PrintPayload, BODY_STYLE_PLAIN, BODY_STYLE_PRESERVED};
