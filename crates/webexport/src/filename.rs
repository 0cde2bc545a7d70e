//! Download file names derived from the page title.

use once_cell::sync::Lazy;
use regex::Regex;

static RESERVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]+"#).expect("reserved character pattern is valid"));

/// Replace every run of characters file systems reject with `_`. A blank title
/// yields `fallback`.
pub fn sanitize_filename(title: &str, fallback: &str) -> String {
    let trimmed = title.trim();
    let base = if trimmed.is_empty() { fallback } else { trimmed };
    RESERVED.replace_all(base, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters() {
        assert_eq!(sanitize_filename("a/b:c", "x"), "a_b_c");
        assert_eq!(sanitize_filename(r#"what? "this" <is>|\"#, "x"), "what_ _this_ _is_");
    }

    #[test]
    fn test_runs_collapse() {
        assert_eq!(sanitize_filename("a//::b", "x"), "a_b");
    }

    #[test]
    fn test_blank_title_uses_fallback() {
        assert_eq!(sanitize_filename("   ", "exported-selection"), "exported-selection");
        assert_eq!(sanitize_filename("  Report  ", "x"), "Report");
    }
}
