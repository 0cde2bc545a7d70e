//! MarkdownService - the entry point for Node to Markdown conversion.

use webexport_dom::Node;

use crate::convert::convert;
use crate::options::Options;
use crate::utilities::{escape_markdown_text, join_documents};

/// The service for converting picked DOM subtrees to Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownService {
    options: Options,
}

impl MarkdownService {
    /// Create a new MarkdownService with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MarkdownService with custom options
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Convert one picked element to a normalized Markdown document
    pub fn convert(&self, root: &Node) -> String {
        convert(root, &self.options)
    }

    /// Convert several picked elements, in selection order, into one document
    pub fn convert_all<'a, I>(&self, roots: I) -> String
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let documents: Vec<String> = roots.into_iter().map(|root| self.convert(root)).collect();
        join_documents(documents, &self.options.separator)
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        escape_markdown_text(text)
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }
}
