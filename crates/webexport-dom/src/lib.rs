//! # webexport-dom
//!
//! The DOM model shared by the element export pipeline.
//!
//! A page adapter describes live elements into the CDP-style [`Node`] structure.
//! Every later stage works on these owned trees:
//!
//! - **Markdown conversion** reads a described subtree.
//! - **Snapshot building** reads the described source and writes a
//!   [`Node::detached_clone`] of it.
//! - **Print surfaces** are plain [`Document`]s populated with snapshot nodes.
//!
//! ## Example
//!
//! ```rust
//! use webexport_dom::Node;
//!
//! let mut p = Node::element("p");
//! p.add_child(Node::text("Hello "));
//! p.add_child(Node::element("b").with_child(Node::text("World")));
//!
//! assert_eq!(p.outer_html(), "<p>Hello <b>World</b></p>");
//! assert_eq!(p.element_paths().len(), 2);
//! ```

pub mod document;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
pub mod style;
mod utilities;

pub use document::Document;
#[cfg(feature = "html")]
pub use html::{element_to_node, parse_document, parse_html};
pub use node::{LiveState, Node, NodeId, NodePath, NodeType};
pub use style::ComputedStyle;
pub use utilities::*;
