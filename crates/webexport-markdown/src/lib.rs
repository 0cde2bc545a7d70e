//! # webexport-markdown
//!
//! Convert a picked DOM subtree to Markdown.
//!
//! The converter is a pure function over [`webexport_dom::Node`]: it never mutates
//! the tree and it reads form controls through their live state, so a checkbox the
//! user ticked renders as `[x]` even though its markup says otherwise.
//!
//! ## Example
//!
//! ```rust
//! use webexport_dom::Node;
//! use webexport_markdown::MarkdownService;
//!
//! let mut p = Node::element("p");
//! p.add_child(Node::text("Hello "));
//! p.add_child(Node::element("b").with_child(Node::text("World")));
//! let root = Node::element("div").with_child(p);
//!
//! let markdown = MarkdownService::new().convert(&root);
//! assert_eq!(markdown, "Hello **World**");
//! ```

pub mod classify;
mod convert;
mod options;
mod service;
mod utilities;

pub use classify::{classify, InlineKind, ListKind, NodeKind, BLOCK_TAGS};
pub use convert::convert;
pub use options::Options;
pub use service::MarkdownService;
pub use utilities::{escape_markdown_text, join_documents, normalize_markdown, normalize_whitespace};
