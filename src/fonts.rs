//! Font name resolution.
//!
//! Maps a requested document font to a prioritized CSS font-family chain.
//! A small override table covers typefaces that are usually unavailable in
//! the rendering environment (proprietary Office fonts substituted by their
//! metric-compatible open counterparts); everything else gets the default
//! fallback chain ending in a generic family.

/// Font used when a cell requests no font at all.
pub const DEFAULT_FONT: &str = "Calibri";

/// Default fallback chain appended after the requested family.
const DEFAULT_FALLBACKS: [&str; 3] = ["Arial", "Helvetica", "sans-serif"];

/// Substitution chains for fonts that commonly need them.
/// The requested name stays first so the real font wins when installed.
const FONT_OVERRIDES: [(&str, &[&str]); 5] = [
    ("calibri", &["Carlito", "Arial", "Helvetica", "sans-serif"]),
    ("cambria", &["Caladea", "Georgia", "serif"]),
    ("times new roman", &["Liberation Serif", "Times", "serif"]),
    ("courier new", &["Liberation Mono", "Courier", "monospace"]),
    ("arial", &["Liberation Sans", "Helvetica", "sans-serif"]),
];

/// Resolve a requested font name into a prioritized family list.
///
/// The requested name (trimmed of surrounding quotes) comes first, followed
/// by its override chain or the default fallbacks. The list never contains
/// case-insensitive duplicates; first occurrence wins.
pub fn resolve_font_stack(requested: &str) -> Vec<String> {
    let name = requested.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    let name = if name.is_empty() { DEFAULT_FONT } else { name };

    let fallbacks: &[&str] = FONT_OVERRIDES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map_or(&DEFAULT_FALLBACKS, |(_, chain)| chain);

    let mut stack: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);
    let mut push_unique = |family: &str, stack: &mut Vec<String>| {
        if !stack.iter().any(|f| f.eq_ignore_ascii_case(family)) {
            stack.push(family.to_string());
        }
    };

    push_unique(name, &mut stack);
    for family in fallbacks {
        push_unique(family, &mut stack);
    }
    stack
}

/// Serialize a family list into a CSS `font-family` value.
///
/// Families containing whitespace are double-quoted.
pub fn font_family_css(stack: &[String]) -> String {
    stack
        .iter()
        .map(|family| {
            if family.chars().any(char::is_whitespace) {
                format!("\"{family}\"")
            } else {
                family.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extract the first family from a CSS `font-family` value, unquoted and
/// trimmed. Returns `None` for an empty value.
pub fn first_family(css_value: &str) -> Option<String> {
    let first = css_value.split(',').next()?;
    let name = first.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_override_chain() {
        let stack = resolve_font_stack("Calibri");
        assert_eq!(stack.first().map(String::as_str), Some("Calibri"));
        assert!(stack.iter().any(|f| f == "Carlito"));
        assert_eq!(stack.last().map(String::as_str), Some("sans-serif"));
    }

    #[test]
    fn test_override_is_case_insensitive() {
        let upper = resolve_font_stack("CALIBRI");
        let lower = resolve_font_stack("calibri");
        // requested casing is preserved in slot 0, chain is identical
        assert_eq!(upper[0], "CALIBRI");
        assert_eq!(lower[0], "calibri");
        assert_eq!(upper[1..], lower[1..]);
        assert!(upper.iter().any(|f| f == "Carlito"));
    }

    #[test]
    fn test_unknown_font_gets_default_chain() {
        let stack = resolve_font_stack("Comic Sans MS");
        assert_eq!(
            stack,
            vec!["Comic Sans MS", "Arial", "Helvetica", "sans-serif"]
        );
    }

    #[test]
    fn test_no_duplicates() {
        // "Arial" appears both as the requested name and in its chain
        let stack = resolve_font_stack("Arial");
        let mut seen = std::collections::HashSet::new();
        for family in &stack {
            assert!(seen.insert(family.to_ascii_lowercase()), "dup: {family}");
        }
        assert_eq!(stack.first().map(String::as_str), Some("Arial"));
    }

    #[test]
    fn test_empty_defaults() {
        let stack = resolve_font_stack("  ");
        assert_eq!(stack.first().map(String::as_str), Some(DEFAULT_FONT));
    }

    #[test]
    fn test_quoted_name_is_trimmed() {
        let stack = resolve_font_stack("\"Times New Roman\"");
        assert_eq!(stack.first().map(String::as_str), Some("Times New Roman"));
        assert!(stack.iter().any(|f| f == "Liberation Serif"));
    }

    #[test]
    fn test_css_serialization_quotes_whitespace() {
        let css = font_family_css(&resolve_font_stack("Times New Roman"));
        assert!(css.starts_with("\"Times New Roman\", "));
        assert!(css.ends_with("serif"));
    }

    #[test]
    fn test_first_family() {
        assert_eq!(
            first_family("\"Times New Roman\", serif"),
            Some("Times New Roman".to_string())
        );
        assert_eq!(first_family("Calibri, Carlito"), Some("Calibri".to_string()));
        assert_eq!(first_family(""), None);
    }
}
