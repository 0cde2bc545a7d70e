//! Owned DOM trees in the Chrome DevTools Protocol node shape.
//!
//! A host that describes a live page element into this shape also records the
//! element's live IDL properties in [`LiveState`], so that downstream stages
//! (Markdown conversion, snapshot building) never need to reach back into the page.

use crate::utilities::{escape_html_attr, escape_html_text, is_raw_text, is_void};

/// `Node.nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentFragment = 11,
}

impl From<u32> for NodeType {
    fn from(value: u32) -> Self {
        match value {
            1 => NodeType::Element,
            3 => NodeType::Text,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            11 => NodeType::DocumentFragment,
            _ => NodeType::Element,
        }
    }
}

/// Host-side identity of a live node (CDP `backendNodeId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Live IDL properties read off the page when an element is described.
///
/// Markup attributes only carry the *initial* state of a form control; the values a
/// user typed or toggled live here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveState {
    /// `HTMLInputElement.value` / `HTMLTextAreaElement.value`
    pub value: Option<String>,
    /// `HTMLInputElement.checked`
    pub checked: Option<bool>,
    /// `HTMLOptionElement.selected`
    pub selected: Option<bool>,
    /// `HTMLImageElement.currentSrc`
    pub current_src: Option<String>,
}

/// Child-index path from a root node, e.g. `[0, 2]` is the third child of the first child.
pub type NodePath = Vec<usize>;

/// An owned DOM node, shaped like CDP's `DOM.Node`.
#[derive(Debug, Clone)]
pub struct Node {
    /// Host identity, absent for detached copies
    pub node_id: Option<NodeId>,

    pub node_type: NodeType,

    /// `DIV`, `#text`, `#document-fragment`, ...
    pub node_name: String,

    /// Character data of text and comment nodes
    pub node_value: Option<String>,

    /// `[name, value, name, value, ...]`, in source order
    pub attributes: Option<Vec<String>>,

    /// Child nodes
    pub children: Option<Vec<Node>>,

    /// Live properties, present only on nodes described from a live page
    pub state: Option<LiveState>,
}

impl Node {
    /// Element without attributes. `tag_name` is stored upper case.
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_id: None,
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
            state: None,
        }
    }

    /// Element with the given `(name, value)` pairs
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    pub fn text(content: &str) -> Self {
        Self {
            node_id: None,
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
            state: None,
        }
    }

    /// An empty fragment, used as a neutral root
    pub fn document_fragment() -> Self {
        Self {
            node_id: None,
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
            state: None,
        }
    }

    /// Attach host identity
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.node_id = Some(id);
        self
    }

    /// Attach live properties
    pub fn with_state(mut self, state: LiveState) -> Self {
        self.state = Some(state);
        self
    }

    /// Append a child and return self, for building trees inline
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Deep copy that carries no host identity and no live state.
    ///
    /// Equivalent of `cloneNode(true)`: the copy is detached from the page, so anything
    /// live must be written into its attributes explicitly.
    pub fn detached_clone(&self) -> Node {
        Node {
            node_id: None,
            node_type: self.node_type,
            node_name: self.node_name.clone(),
            node_value: self.node_value.clone(),
            attributes: self.attributes.clone(),
            children: self
                .children
                .as_ref()
                .map(|children| children.iter().map(Node::detached_clone).collect()),
            state: None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Lower-case tag name, empty for non-elements
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Check the tag name without allocating
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(tag)
    }

    /// Attribute value, matching names case-insensitively
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;

        attrs
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    /// Whether the attribute is present, whatever its value
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Names of all attributes, in document order
    pub fn attr_names(&self) -> Vec<String> {
        self.attributes
            .iter()
            .flat_map(|attrs| attrs.chunks_exact(2).map(|pair| pair[0].clone()))
            .collect()
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);

        let mut i = 0;
        while i + 1 < attrs.len() {
            if attrs[i].eq_ignore_ascii_case(name) {
                attrs[i + 1] = value.to_string();
                return;
            }
            i += 2;
        }
        // Add new attribute
        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let attrs = self.attributes.as_mut()?;
        let mut i = 0;
        while i + 1 < attrs.len() {
            if attrs[i].eq_ignore_ascii_case(name) {
                let value = attrs.remove(i + 1);
                attrs.remove(i);
                return Some(value);
            }
            i += 2;
        }
        None
    }

    /// Keep only the attributes whose name passes `keep`
    pub fn retain_attrs<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let Some(attrs) = self.attributes.take() else {
            return;
        };
        let mut kept = Vec::with_capacity(attrs.len());
        let mut iter = attrs.into_iter();
        while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
            if keep(&name) {
                kept.push(name);
                kept.push(value);
            }
        }
        self.attributes = Some(kept);
    }

    /// Append `rules` to the inline `style` attribute
    pub fn append_style(&mut self, rules: &str) {
        let style = match self.attr("style") {
            Some(existing) if !existing.trim().is_empty() => format!("{};{}", existing, rules),
            _ => rules.to_string(),
        };
        self.set_attr("style", &style);
    }

    /// Check for a class in the `class` attribute
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Add a class to the `class` attribute
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", &classes);
    }

    /// Remove a class from the `class` attribute
    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let remaining: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let remaining = remaining.join(" ");
        if remaining.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &remaining);
        }
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Mutable access to the child list
    pub fn child_nodes_mut(&mut self) -> &mut Vec<Node> {
        self.children.get_or_insert_with(Vec::new)
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.child_nodes_mut().push(child);
    }

    /// `Node.textContent`: every descendant text node, concatenated
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self
                .children()
                .map(|child| child.text_content())
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, text: &str) {
        let children = self.child_nodes_mut();
        children.clear();
        if !text.is_empty() {
            children.push(Node::text(text));
        }
    }

    /// True when the element has no element children and no non-whitespace text
    pub fn is_visually_empty(&self) -> bool {
        self.children().all(|child| match child.node_type {
            NodeType::Element => false,
            NodeType::Text => child
                .node_value
                .as_deref()
                .map(|text| text.trim().is_empty())
                .unwrap_or(true),
            _ => true,
        })
    }

    /// Pre-order paths of this node (if it is an element) and every element descendant.
    ///
    /// The order is document order, the same as `[root, ...root.querySelectorAll("*")]`.
    /// Path components index into the full child list, text nodes included.
    pub fn element_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        self.collect_element_paths(&mut current, &mut paths);
        paths
    }

    fn collect_element_paths(&self, current: &mut NodePath, paths: &mut Vec<NodePath>) {
        if self.is_element() {
            paths.push(current.clone());
        }
        for (index, child) in self.children().enumerate() {
            current.push(index);
            child.collect_element_paths(current, paths);
            current.pop();
        }
    }

    /// Resolve a path produced by [`Node::element_paths`]
    pub fn at_path(&self, path: &[usize]) -> Option<&Node> {
        let mut node = self;
        for &index in path {
            node = node.children.as_ref()?.get(index)?;
        }
        Some(node)
    }

    /// Resolve a path mutably
    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &index in path {
            node = node.children.as_mut()?.get_mut(index)?;
        }
        Some(node)
    }

    /// Find the first element (self included) with the given `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<&Node> {
        if self.is_element() && self.attr("id") == Some(id) {
            return Some(self);
        }
        self.children().find_map(|child| child.get_element_by_id(id))
    }

    /// Mutable variant of [`Node::get_element_by_id`]
    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.is_element() && self.attr("id") == Some(id) {
            return Some(self);
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.get_element_by_id_mut(id))
    }

    /// Detach the first descendant with the given `id`
    pub fn remove_element_by_id(&mut self, id: &str) -> Option<Node> {
        let children = self.children.as_mut()?;
        if let Some(index) = children
            .iter()
            .position(|child| child.is_element() && child.attr("id") == Some(id))
        {
            return Some(children.remove(index));
        }
        children
            .iter_mut()
            .find_map(|child| child.remove_element_by_id(id))
    }

    /// Remove every descendant element with the given tag, returning how many were removed
    pub fn remove_descendants_by_tag(&mut self, tag: &str) -> usize {
        let Some(children) = self.children.as_mut() else {
            return 0;
        };
        let before = children.len();
        children.retain(|child| !child.is_tag(tag));
        let mut removed = before - children.len();
        for child in children.iter_mut() {
            removed += child.remove_descendants_by_tag(tag);
        }
        removed
    }

    /// All descendant elements (self included) with the given tag, in document order
    pub fn descendants_by_tag(&self, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_by_tag(tag, &mut found);
        found
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a Node>) {
        if self.is_tag(tag) {
            found.push(self);
        }
        for child in self.children() {
            child.collect_by_tag(tag, found);
        }
    }

    /// Reconstruct outer HTML
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => escape_html_text(self.node_value.as_deref().unwrap_or("")),
            NodeType::Comment => String::new(),
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.serialized_attributes();
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if is_void(&tag) {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
            _ => self.inner_html(),
        }
    }

    /// Serialize the children
    pub fn inner_html(&self) -> String {
        if self.is_element() && is_raw_text(&self.tag_name()) {
            return self.text_content();
        }
        self.children()
            .map(|child| child.outer_html())
            .collect::<Vec<_>>()
            .join("")
    }

    fn serialized_attributes(&self) -> String {
        let Some(ref attrs) = self.attributes else {
            return String::new();
        };

        attrs
            .chunks_exact(2)
            .map(|pair| {
                if pair[1].is_empty() {
                    pair[0].clone()
                } else {
                    format!("{}=\"{}\"", pair[0], escape_html_attr(&pair[1]))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
