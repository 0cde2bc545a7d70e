//! Tag classification.
//!
//! Every node is classified once into a [`NodeKind`]; conversion dispatches on the
//! variant instead of comparing tag strings at each step.

use webexport_dom::{Node, NodeType};

/// Tags that open a block context
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "main", "nav", "ol", "p", "pre", "section", "table",
    "ul",
];

/// Tags that never produce output
pub const IGNORED_TAGS: &[&str] = &["script", "style", "noscript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Strong,
    Emphasis,
    Code,
    Link,
    Image,
    Input,
    TextArea,
    Select,
    /// Any other element: contributes its children's inline content
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Comments, documents, `script`/`style`/`noscript`
    Ignored,
    Text,
    Heading(u8),
    Paragraph,
    Preformatted,
    Blockquote,
    List(ListKind),
    Rule,
    Break,
    /// A block container without its own Markdown syntax
    Block,
    Inline(InlineKind),
}

impl NodeKind {
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Heading(_)
                | NodeKind::Paragraph
                | NodeKind::Preformatted
                | NodeKind::Blockquote
                | NodeKind::List(_)
                | NodeKind::Rule
                | NodeKind::Block
        )
    }
}

/// Check if a tag is in the block set
pub fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag.to_lowercase().as_str())
}

/// Classify a node
pub fn classify(node: &Node) -> NodeKind {
    match node.node_type {
        NodeType::Text => return NodeKind::Text,
        NodeType::Element => {}
        _ => return NodeKind::Ignored,
    }

    let tag = node.tag_name();
    match tag.as_str() {
        t if IGNORED_TAGS.contains(&t) => NodeKind::Ignored,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse().unwrap_or(1);
            NodeKind::Heading(level)
        }
        "p" => NodeKind::Paragraph,
        "pre" => NodeKind::Preformatted,
        "blockquote" => NodeKind::Blockquote,
        "ol" => NodeKind::List(ListKind::Ordered),
        "ul" => NodeKind::List(ListKind::Unordered),
        "hr" => NodeKind::Rule,
        "br" => NodeKind::Break,
        "strong" | "b" => NodeKind::Inline(InlineKind::Strong),
        "em" | "i" => NodeKind::Inline(InlineKind::Emphasis),
        "code" => NodeKind::Inline(InlineKind::Code),
        "a" => NodeKind::Inline(InlineKind::Link),
        "img" => NodeKind::Inline(InlineKind::Image),
        "input" => NodeKind::Inline(InlineKind::Input),
        "textarea" => NodeKind::Inline(InlineKind::TextArea),
        "select" => NodeKind::Inline(InlineKind::Select),
        t if is_block(t) => NodeKind::Block,
        _ => NodeKind::Inline(InlineKind::Plain),
    }
}
