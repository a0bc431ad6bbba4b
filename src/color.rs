//! Packed-color <-> CSS hex conversion.
//!
//! The document format stores colors as packed hex digit strings: either
//! plain RGB ("FF0000") or alpha-prefixed ARGB ("FFFF0000") depending on
//! which part of the file they came from. The grid side always speaks
//! 6-digit CSS hex ("#ff0000"). On write the alpha channel is forced fully
//! opaque; translucent colors do not round-trip by design.

/// Convert a packed color (6 or 8 hex digits, optional leading `#`) into a
/// CSS `#rrggbb` string. Returns `None` for any other shape.
///
/// Casing of the hex digits is preserved as given.
pub fn packed_to_css_hex(packed: &str) -> Option<String> {
    let hex = packed.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(format!("#{hex}")),
        // ARGB: drop the alpha prefix, keep the trailing RGB digits
        8 => hex.get(2..).map(|rgb| format!("#{rgb}")),
        _ => None,
    }
}

/// Convert a CSS hex color (3 or 6 digits, optional leading `#`) into the
/// packed 8-digit ARGB form with forced `FF` alpha.
///
/// 3-digit shorthand expands by doubling each nibble ("#f80" -> "FFFF8800").
/// Output is always uppercase. Any other length returns `None`.
pub fn css_hex_to_packed(hex: &str) -> Option<String> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut rgb = String::with_capacity(6);
            for ch in hex.chars() {
                let up = ch.to_ascii_uppercase();
                rgb.push(up);
                rgb.push(up);
            }
            Some(format!("FF{rgb}"))
        }
        6 => Some(format!("FF{}", hex.to_ascii_uppercase())),
        _ => None,
    }
}

/// Normalize a raw packed color attribute into canonical 8-digit ARGB.
///
/// styles.xml `rgb` attributes come in both 6-digit and 8-digit forms;
/// the internal [`DocumentStyle`](crate::types::DocumentStyle) always
/// carries the 8-digit form.
pub fn normalize_packed(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(format!("FF{}", hex.to_ascii_uppercase())),
        8 => Some(hex.to_ascii_uppercase()),
        _ => None,
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
    use test_case::test_case;

    #[test_case("FFFF0000", "#FF0000"; "argb drops alpha")]
    #[test_case("00FF00", "#00FF00"; "plain rgb")]
    #[test_case("#80aabbcc", "#aabbcc"; "hash prefixed argb keeps casing")]
    fn test_packed_to_css(packed: &str, expected: &str) {
        assert_eq!(packed_to_css_hex(packed), Some(expected.to_string()));
    }

    #[test]
    fn test_packed_to_css_rejects_bad_lengths() {
        assert_eq!(packed_to_css_hex(""), None);
        assert_eq!(packed_to_css_hex("FFF"), None);
        assert_eq!(packed_to_css_hex("12345"), None);
        assert_eq!(packed_to_css_hex("GGGGGG"), None);
    }

    #[test_case("#ff0000", "FFFF0000")]
    #[test_case("00ff00", "FF00FF00")]
    #[test_case("#f80", "FFFF8800"; "three digit expands")]
    #[test_case("ABC", "FFAABBCC")]
    fn test_css_to_packed(css: &str, expected: &str) {
        assert_eq!(css_hex_to_packed(css), Some(expected.to_string()));
    }

    #[test]
    fn test_css_to_packed_rejects_bad_lengths() {
        assert_eq!(css_hex_to_packed("#ffff"), None);
        assert_eq!(css_hex_to_packed("#ff00000"), None);
        assert_eq!(css_hex_to_packed("red"), None);
        assert_eq!(css_hex_to_packed(""), None);
    }

    #[test]
    fn test_round_trip_canonicalizes() {
        // packed(css) then css(packed) yields the canonical 6-digit form
        for css in ["#ff0000", "#ABC", "#AbCdEf"] {
            let packed = css_hex_to_packed(css).unwrap();
            let back = packed_to_css_hex(&packed).unwrap();
            assert_eq!(back.len(), 7);
            assert!(back.starts_with('#'));
            // canonical: uppercase 6-digit expansion of the input
            let expanded = css_hex_to_packed(&back).unwrap();
            assert_eq!(expanded, packed);
        }
    }

    #[test]
    fn test_normalize_packed() {
        assert_eq!(normalize_packed("ff0000"), Some("FFFF0000".to_string()));
        assert_eq!(normalize_packed("80FF0000"), Some("80FF0000".to_string()));
        assert_eq!(normalize_packed("nope"), None);
    }
}
