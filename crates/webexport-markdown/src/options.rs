//! Configuration options for Markdown output

/// Options for Markdown output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Horizontal rule string
    pub hr: String,

    /// Fence string for preformatted blocks
    pub fence: String,

    /// Separator placed between the documents of a multi-target export
    pub separator: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bullet_list_marker: '-',
            hr: "---".to_string(),
            fence: "```".to_string(),
            separator: "\n\n---\n\n".to_string(),
        }
    }
}
