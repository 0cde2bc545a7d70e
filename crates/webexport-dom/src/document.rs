//! A minimal document: the page a print surface is mounted into, or the
//! standalone document populated inside a fallback print window.

use crate::node::Node;

#[derive(Debug, Clone)]
pub struct Document {
    /// Location of the document
    pub url: String,
    /// Explicit `document.baseURI`, when it differs from `url`
    pub base_uri: Option<String>,
    pub title: String,
    pub head: Node,
    pub body: Node,
}

impl Document {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            base_uri: None,
            title: String::new(),
            head: Node::element("head"),
            body: Node::element("body"),
        }
    }

    /// `document.baseURI || location.href`
    pub fn base_uri(&self) -> &str {
        match self.base_uri.as_deref() {
            Some(base) if !base.is_empty() => base,
            _ => &self.url,
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Node> {
        self.head
            .get_element_by_id(id)
            .or_else(|| self.body.get_element_by_id(id))
    }

    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.head.get_element_by_id(id).is_some() {
            return self.head.get_element_by_id_mut(id);
        }
        self.body.get_element_by_id_mut(id)
    }

    /// Detach the element with `id` from head or body
    pub fn remove_element_by_id(&mut self, id: &str) -> Option<Node> {
        self.head
            .remove_element_by_id(id)
            .or_else(|| self.body.remove_element_by_id(id))
    }

    /// Drop every child of head and body
    pub fn clear(&mut self) {
        self.head.child_nodes_mut().clear();
        self.body.child_nodes_mut().clear();
    }

    /// Serialize as a complete HTML document
    pub fn to_html(&self) -> String {
        let title = if self.title.is_empty() {
            String::new()
        } else {
            Node::element("title")
                .with_child(Node::text(&self.title))
                .outer_html()
        };
        format!(
            "<!DOCTYPE html><html><head>{}{}</head>{}</html>",
            self.head.inner_html(),
            title,
            self.body.outer_html()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_uri_falls_back_to_url() {
        let mut doc = Document::new("https://example.com/a/b.html");
        assert_eq!(doc.base_uri(), "https://example.com/a/b.html");
        doc.base_uri = Some("https://cdn.example.com/".to_string());
        assert_eq!(doc.base_uri(), "https://cdn.example.com/");
    }

    #[test]
    fn test_lookup_and_remove_across_head_and_body() {
        let mut doc = Document::new("about:blank");
        doc.head
            .add_child(Node::element_with_attrs("style", vec![("id", "s")]));
        doc.body
            .add_child(Node::element_with_attrs("div", vec![("id", "c")]));

        assert!(doc.get_element_by_id("s").is_some());
        assert!(doc.get_element_by_id_mut("c").is_some());
        assert!(doc.remove_element_by_id("s").is_some());
        assert!(doc.remove_element_by_id("c").is_some());
        assert!(doc.get_element_by_id("c").is_none());
    }

    #[test]
    fn test_to_html() {
        let mut doc = Document::new("about:blank");
        doc.title = "Exported".to_string();
        doc.body.add_child(Node::element("p").with_child(Node::text("x")));
        assert_eq!(
            doc.to_html(),
            "<!DOCTYPE html><html><head><title>Exported</title></head><body><p>x</p></body></html>"
        );
    }
}
