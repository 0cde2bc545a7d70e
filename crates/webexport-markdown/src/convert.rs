//! Convert a Node tree to Markdown text.
//!
//! Block children are converted one by one and joined with a blank line. Runs of
//! inline siblings between them are concatenated into a single block, so inline
//! content never gets blank lines inserted.

use webexport_dom::Node;

use crate::classify::{classify, is_block, InlineKind, ListKind, NodeKind};
use crate::options::Options;
use crate::utilities::{escape_markdown_text, normalize_markdown, normalize_whitespace};

/// Conversion context
#[derive(Debug, Default, Clone, Copy)]
struct Context {
    list_depth: usize,
}

impl Context {
    fn nested(self) -> Self {
        Self {
            list_depth: self.list_depth + 1,
        }
    }
}

/// Convert the children of `root` into a normalized Markdown document.
///
/// The root's own tag does not contribute syntax: picking a `<p>` yields its text,
/// not an extra paragraph wrapper.
pub fn convert(root: &Node, options: &Options) -> String {
    let content = convert_block_children(root, options, Context::default());
    normalize_markdown(&content)
}

fn convert_block_children(node: &Node, options: &Options, ctx: Context) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut inline = String::new();

    for child in node.children() {
        match classify(child) {
            NodeKind::Ignored => {}
            NodeKind::Text | NodeKind::Break | NodeKind::Inline(_) => {
                inline.push_str(&convert_inline_node(child, options, ctx));
            }
            _ => {
                flush_inline(&mut inline, &mut blocks);
                let block = convert_node(child, options, ctx);
                let block = block.trim();
                if !block.is_empty() {
                    blocks.push(block.to_string());
                }
            }
        }
    }
    flush_inline(&mut inline, &mut blocks);

    blocks.join("\n\n")
}

/// Move a pending inline run into `blocks` as one block, each line trimmed
fn flush_inline(inline: &mut String, blocks: &mut Vec<String>) {
    let text = inline
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    if !text.is_empty() {
        blocks.push(text.to_string());
    }
    inline.clear();
}

fn convert_node(node: &Node, options: &Options, ctx: Context) -> String {
    match classify(node) {
        NodeKind::Ignored => String::new(),
        NodeKind::Text => convert_text(node),
        NodeKind::Heading(level) => {
            let content = convert_inline_children(node, options, ctx);
            let content = content.trim();
            if content.is_empty() {
                String::new()
            } else {
                format!("{} {}", "#".repeat(level as usize), content)
            }
        }
        NodeKind::Paragraph => convert_inline_children(node, options, ctx)
            .trim()
            .to_string(),
        NodeKind::Preformatted => {
            let text = node.text_content();
            let text = text.strip_suffix('\n').unwrap_or(&text);
            format!("{fence}\n{text}\n{fence}", fence = options.fence)
        }
        NodeKind::Blockquote => {
            let content = convert_block_children(node, options, ctx);
            if content.is_empty() {
                return String::new();
            }
            content
                .split('\n')
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        NodeKind::List(kind) => convert_list(node, kind, options, ctx),
        NodeKind::Rule => options.hr.clone(),
        NodeKind::Break => "\n".to_string(),
        NodeKind::Block => convert_block_children(node, options, ctx),
        NodeKind::Inline(_) => convert_inline_node(node, options, ctx).trim().to_string(),
    }
}

fn convert_text(node: &Node) -> String {
    let text = node.node_value.as_deref().unwrap_or("");
    escape_markdown_text(&normalize_whitespace(text))
}

fn convert_inline_children(node: &Node, options: &Options, ctx: Context) -> String {
    node.children()
        .map(|child| convert_inline_node(child, options, ctx))
        .collect()
}

fn convert_inline_node(node: &Node, options: &Options, ctx: Context) -> String {
    let kind = match classify(node) {
        NodeKind::Ignored => return String::new(),
        NodeKind::Text => return convert_text(node),
        NodeKind::Break => return "\n".to_string(),
        NodeKind::Inline(kind) => kind,
        // Block elements nested in inline context contribute their inline content
        _ => InlineKind::Plain,
    };

    match kind {
        InlineKind::Strong => wrap_trimmed(&convert_inline_children(node, options, ctx), "**"),
        InlineKind::Emphasis => wrap_trimmed(&convert_inline_children(node, options, ctx), "*"),
        InlineKind::Code => {
            let content = node.text_content();
            if content.is_empty() {
                String::new()
            } else {
                format!("`{}`", escape_markdown_text(&content))
            }
        }
        InlineKind::Link => {
            let children = convert_inline_children(node, options, ctx);
            let text = match children.trim() {
                "" => escape_markdown_text(&node.text_content()),
                trimmed => trimmed.to_string(),
            };
            match node.attr("href") {
                Some(href) if !href.is_empty() => {
                    let label = if text.is_empty() { href } else { text.as_str() };
                    format!("[{}]({})", label, href)
                }
                _ => text,
            }
        }
        InlineKind::Image => {
            let alt = escape_markdown_text(node.attr("alt").unwrap_or(""));
            match node.attr("src") {
                Some(src) if !src.is_empty() => format!("![{}]({})", alt, src),
                _ => alt,
            }
        }
        InlineKind::Input => format_input_value(node),
        InlineKind::TextArea => {
            let value = live_value(node).unwrap_or_default();
            if value.is_empty() {
                escape_markdown_text(&node.text_content())
            } else {
                escape_markdown_text(&value)
            }
        }
        InlineKind::Select => {
            let text = selected_option(node)
                .map(Node::text_content)
                .unwrap_or_else(|| node.text_content());
            escape_markdown_text(&normalize_whitespace(&text))
        }
        InlineKind::Plain => convert_inline_children(node, options, ctx),
    }
}

fn wrap_trimmed(content: &str, delimiter: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else {
        format!("{delimiter}{content}{delimiter}")
    }
}

/// Convert a `<ul>`/`<ol>`.
///
/// Ordered numbering advances once per `<li>` even when the item renders to nothing,
/// so `start=3` with an empty second item yields `3.` then `5.`.
fn convert_list(node: &Node, kind: ListKind, options: &Options, ctx: Context) -> String {
    let mut index = node
        .attr("start")
        .and_then(parse_int_prefix)
        .filter(|start| *start >= 1)
        .unwrap_or(1);
    let indent = "  ".repeat(ctx.list_depth);
    let continuation = format!("\n{}  ", indent);

    let mut lines = Vec::new();
    for item in node.children().filter(|child| child.is_tag("li")) {
        let content = convert_list_item(item, options, ctx.nested());
        let content = content.trim();
        if !content.is_empty() {
            let prefix = match kind {
                ListKind::Ordered => format!("{}. ", index),
                ListKind::Unordered => format!("{} ", options.bullet_list_marker),
            };
            lines.push(format!(
                "{}{}{}",
                indent,
                prefix,
                content.replace('\n', &continuation)
            ));
        }
        index += 1;
    }
    lines.join("\n")
}

/// Convert one `<li>`: inline runs become lines, nested lists and blocks are
/// flushed as their own lines in source order.
fn convert_list_item(node: &Node, options: &Options, ctx: Context) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut inline = String::new();

    for child in node.children() {
        if child.is_element() {
            match classify(child) {
                NodeKind::List(kind) => {
                    flush_inline(&mut inline, &mut blocks);
                    let nested = convert_list(child, kind, options, ctx);
                    if !nested.is_empty() {
                        blocks.push(nested);
                    }
                    continue;
                }
                _ if is_block(&child.tag_name()) => {
                    flush_inline(&mut inline, &mut blocks);
                    let block = convert_node(child, options, ctx);
                    if !block.is_empty() {
                        blocks.push(block);
                    }
                    continue;
                }
                _ => {}
            }
        }
        inline.push_str(&convert_inline_node(child, options, ctx));
    }
    flush_inline(&mut inline, &mut blocks);

    blocks.join("\n")
}

fn format_input_value(node: &Node) -> String {
    let input_type = node.attr("type").unwrap_or("text").to_lowercase();
    if input_type == "checkbox" || input_type == "radio" {
        return if live_checked(node) { "[x]" } else { "[ ]" }.to_string();
    }
    escape_markdown_text(&live_value(node).unwrap_or_default())
}

/// Current value: live state first, markup second
fn live_value(node: &Node) -> Option<String> {
    node.state
        .as_ref()
        .and_then(|state| state.value.clone())
        .or_else(|| node.attr("value").map(str::to_string))
}

fn live_checked(node: &Node) -> bool {
    node.state
        .as_ref()
        .and_then(|state| state.checked)
        .unwrap_or_else(|| node.has_attr("checked"))
}

fn option_selected(option: &Node) -> bool {
    option
        .state
        .as_ref()
        .and_then(|state| state.selected)
        .unwrap_or_else(|| option.has_attr("selected"))
}

/// The option `option:checked` would match.
///
/// A single-choice select with nothing explicitly selected displays its first option.
fn selected_option(select: &Node) -> Option<&Node> {
    let options = select.descendants_by_tag("option");
    options
        .iter()
        .copied()
        .find(|option| option_selected(option))
        .or_else(|| {
            if select.has_attr("multiple") {
                None
            } else {
                options.first().copied()
            }
        })
}

/// `parseInt`-style: optional sign and leading digits, trailing garbage ignored
fn parse_int_prefix(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
