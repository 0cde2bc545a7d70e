//! HTML parsing support.
//!
//! This module provides functionality to parse HTML strings and convert them
//! to the CDP-style Node structure. Form-control markup state is lifted into
//! [`LiveState`] so that a parsed tree looks like one described from a page
//! the user has not touched yet.

use scraper::{ElementRef, Html, Node as ScraperNode};
use url::Url;

use crate::document::Document;
use crate::node::{LiveState, Node};

/// Parse an HTML fragment into a Node tree rooted at the synthetic `html` element.
///
/// # Example
///
/// ```rust
/// use webexport_dom::parse_html;
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// assert_eq!(node.tag_name(), "html");
/// assert_eq!(node.text_content(), "Hello World");
/// ```
pub fn parse_html(html: &str) -> Node {
    let fragment = Html::parse_fragment(html);
    element_to_node(fragment.root_element())
}

/// Parse a complete HTML document.
///
/// Image `currentSrc` values are absolute, resolved against the document base the
/// way a browser reports them.
pub fn parse_document(html: &str, url: &str) -> Document {
    let parsed = Html::parse_document(html);
    let mut document = Document::new(url);

    for child in parsed.root_element().children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "head" => document.head = element_to_node(child),
            "body" => document.body = element_to_node(child),
            _ => {}
        }
    }

    document.title = document
        .head
        .descendants_by_tag("title")
        .first()
        .map(|title| title.text_content().trim().to_string())
        .unwrap_or_default();
    document.base_uri = document
        .head
        .descendants_by_tag("base")
        .first()
        .and_then(|base| base.attr("href"))
        .map(str::to_string);

    if let Ok(base) = Url::parse(&document.url).and_then(|page| page.join(document.base_uri())) {
        resolve_image_sources(&mut document.head, &base);
        resolve_image_sources(&mut document.body, &base);
    }

    document
}

fn resolve_image_sources(node: &mut Node, base: &Url) {
    if node.is_tag("img") {
        if let Some(src) = node.state.as_mut().and_then(|state| state.current_src.as_mut()) {
            if let Ok(resolved) = base.join(src.as_str()) {
                *src = resolved.to_string();
            }
        }
    }
    for child in node.child_nodes_mut().iter_mut() {
        resolve_image_sources(child, base);
    }
}

/// Convert a scraper ElementRef to our Node structure
pub fn element_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();

    // Collect attributes
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(tag, attrs);

    // Process children
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(element_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    if let Some(state) = markup_state(&node) {
        node.state = Some(state);
    }
    node
}

/// Initial live state implied by markup alone
fn markup_state(node: &Node) -> Option<LiveState> {
    match node.tag_name().as_str() {
        "input" => Some(LiveState {
            value: Some(node.attr("value").unwrap_or("").to_string()),
            checked: Some(node.has_attr("checked")),
            ..Default::default()
        }),
        "textarea" => Some(LiveState {
            value: Some(node.text_content()),
            ..Default::default()
        }),
        "option" => Some(LiveState {
            selected: Some(node.has_attr("selected")),
            ..Default::default()
        }),
        "img" => node.attr("src").map(|src| LiveState {
            current_src: Some(src.to_string()),
            ..Default::default()
        }),
        _ => None,
    }
}
