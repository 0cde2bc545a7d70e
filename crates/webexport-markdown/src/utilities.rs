//! Text escaping and document normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_ENDINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("line ending pattern is valid"));
static TRAILING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+\n").expect("trailing space pattern is valid"));
static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run pattern is valid"));

/// Collapse whitespace runs (non-breaking spaces included) to a single space
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_whitespace = false;

    for c in text.chars() {
        if c.is_whitespace() || c == '\u{a0}' {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Escape characters Markdown would otherwise interpret
pub fn escape_markdown_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '#' => {
                result.push('\\');
                result.push(c);
            }
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

/// Final cleanup applied to every converted document
pub fn normalize_markdown(text: &str) -> String {
    let text = LINE_ENDINGS.replace_all(text, "\n");
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Join per-target documents, dropping the empty ones
pub fn join_documents<I, S>(documents: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    documents
        .into_iter()
        .filter(|doc| !doc.as_ref().trim().is_empty())
        .map(|doc| doc.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown_text() {
        assert_eq!(escape_markdown_text("*bold*_?"), "\\*bold\\*\\_?");
        assert_eq!(escape_markdown_text("[a](b) #1"), "\\[a\\](b) \\#1");
        assert_eq!(escape_markdown_text("a\\b `c`"), "a\\\\b \\`c\\`");
        assert_eq!(escape_markdown_text("<br> & co"), "&lt;br&gt; & co");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a\u{a0}\u{a0}b \n\t c"), "a b c");
        assert_eq!(normalize_whitespace("  "), " ");
    }

    #[test]
    fn test_normalize_markdown() {
        let raw = "\n  title  \r\nline\t \r\n\r\n\r\n\n\nnext\rend  ";
        let normalized = normalize_markdown(raw);
        assert_eq!(normalized, "title\nline\n\nnext\nend");
        assert!(!normalized.contains('\r'));
        assert!(!normalized.contains("\n\n\n"));
    }

    #[test]
    fn test_join_documents_drops_empty() {
        let joined = join_documents(["a", "", "  ", "b"], "\n\n---\n\n");
        assert_eq!(joined, "a\n\n---\n\nb");
        assert_eq!(join_documents(Vec::<String>::new(), "\n"), "");
    }
}
