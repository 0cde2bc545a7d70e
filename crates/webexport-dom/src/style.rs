//! Computed style snapshots.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static SINGLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"\s)][^)]*?))\s*\)$"#)
        .expect("background url pattern is valid")
});

/// The resolved style of one element, in the order the engine enumerates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    properties: IndexMap<String, String>,
}

impl ComputedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, keeping first-insertion order
    pub fn set(&mut self, property: &str, value: &str) {
        self.properties
            .insert(property.to_string(), value.to_string());
    }

    pub fn with(mut self, property: &str, value: &str) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialize every property as `prop:value;`
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(property, value)| format!("{}:{};", property, value))
            .collect()
    }

    /// The URL of `background-image` when it is exactly one `url(...)`
    pub fn background_image_url(&self) -> Option<String> {
        let value = self.get("background-image")?.trim();
        let captures = SINGLE_URL.captures(value)?;
        let url = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))?
            .as_str()
            .trim();
        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    }

    /// `object-fit` that reproduces the element's `background-size`
    pub fn object_fit(&self) -> &'static str {
        match self.get("background-size").map(str::trim) {
            Some("contain") => "contain",
            _ => "cover",
        }
    }
}

impl FromIterator<(String, String)> for ComputedStyle {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_text_keeps_order() {
        let style = ComputedStyle::new()
            .with("display", "block")
            .with("color", "rgb(0, 0, 0)");
        assert_eq!(style.css_text(), "display:block;color:rgb(0, 0, 0);");
    }

    #[test]
    fn test_background_image_url_variants() {
        let quoted = ComputedStyle::new().with("background-image", "url(\"https://a.test/x.png\")");
        assert_eq!(
            quoted.background_image_url().as_deref(),
            Some("https://a.test/x.png")
        );

        let single = ComputedStyle::new().with("background-image", "url('b.png')");
        assert_eq!(single.background_image_url().as_deref(), Some("b.png"));

        let bare = ComputedStyle::new().with("background-image", "url(c.png)");
        assert_eq!(bare.background_image_url().as_deref(), Some("c.png"));
    }

    #[test]
    fn test_background_image_url_rejects_non_single() {
        for value in [
            "none",
            "url(a.png), url(b.png)",
            "linear-gradient(red, blue)",
            "url()",
        ] {
            let style = ComputedStyle::new().with("background-image", value);
            assert_eq!(style.background_image_url(), None, "{value}");
        }
    }

    #[test]
    fn test_object_fit() {
        let contain = ComputedStyle::new().with("background-size", "contain");
        assert_eq!(contain.object_fit(), "contain");
        let auto = ComputedStyle::new().with("background-size", "auto");
        assert_eq!(auto.object_fit(), "cover");
    }
}
