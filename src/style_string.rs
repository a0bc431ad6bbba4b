//! Style string algebra.
//!
//! The interchange format between document styles and rendered cell styles
//! is a semicolon-delimited CSS-like property list: `color: #ff0000;
//! font-weight: bold`. Every producer in this crate funnels through
//! [`serialize`]/[`merge`] so no two code paths can diverge on the format.
//!
//! Unknown properties are carried through untouched; they are someone
//! else's business.

use std::collections::BTreeMap;

/// Parsed property map. `BTreeMap` keeps serialization deterministic.
pub type PropertyMap = BTreeMap<String, String>;

/// Parse a style string into a property map.
///
/// Splits on `;`, then on the first `:` within each segment. Whitespace is
/// trimmed; segments missing a property or value are dropped silently.
pub fn parse(style: &str) -> PropertyMap {
    let mut props = PropertyMap::new();
    for segment in style.split(';') {
        let Some((key, value)) = segment.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        props.insert(key.to_string(), value.to_string());
    }
    props
}

/// Serialize a property map back into a style string.
pub fn serialize(props: &PropertyMap) -> String {
    props
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Merge property updates into an existing style string.
///
/// Updates always win per property; properties not mentioned in `updates`
/// are preserved. Merging an empty update set re-serializes the existing
/// string unchanged (modulo canonical formatting).
pub fn merge(existing: &str, updates: &PropertyMap) -> String {
    let mut props = parse(existing);
    for (key, value) in updates {
        props.insert(key.clone(), value.clone());
    }
    serialize(&props)
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

    fn map(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_basic() {
        let props = parse("color: #ff0000; font-weight: bold");
        assert_eq!(props, map(&[("color", "#ff0000"), ("font-weight", "bold")]));
    }

    #[test]
    fn test_parse_drops_malformed_segments() {
        let props = parse("color: red; ;; nonsense; : orphan; empty:");
        assert_eq!(props, map(&[("color", "red")]));
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let props = parse("background: url(a:b); color: red");
        assert_eq!(
            props.get("background").map(String::as_str),
            Some("url(a:b)")
        );
        assert_eq!(props.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let original = map(&[
            ("color", "#ff0000"),
            ("font-size", "16px"),
            ("x-custom", "keep me"),
        ]);
        assert_eq!(parse(&serialize(&original)), original);
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let merged = merge(
            "color: red; font-size: 12px",
            &map(&[("color", "blue"), ("font-weight", "bold")]),
        );
        let props = parse(&merged);
        assert_eq!(props.get("color").map(String::as_str), Some("blue"));
        assert_eq!(props.get("font-size").map(String::as_str), Some("12px"));
        assert_eq!(props.get("font-weight").map(String::as_str), Some("bold"));
    }

    #[test]
    fn test_merge_empty_updates_is_noop() {
        let existing = "font-size: 16px; color: red";
        let merged = merge(existing, &PropertyMap::new());
        assert_eq!(parse(&merged), parse(existing));
    }

    #[test]
    fn test_merge_preserves_unknown_properties() {
        let merged = merge("writing-mode: vertical-rl", &map(&[("color", "red")]));
        let props = parse(&merged);
        assert_eq!(
            props.get("writing-mode").map(String::as_str),
            Some("vertical-rl")
        );
    }

    #[test]
    fn test_idempotent_reserialization() {
        let s = serialize(&map(&[("b", "2"), ("a", "1")]));
        assert_eq!(serialize(&parse(&s)), s);
    }
}
