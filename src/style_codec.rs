//! Bidirectional conversion between [`DocumentStyle`] and style strings.
//!
//! One internal style representation, one style-string grammar. The
//! document reader and writer both funnel through these two functions (and
//! through [`crate::style_string`] for serialization), so the grammar has
//! a single producer no matter which side generated the string.

use crate::color;
use crate::fonts;
use crate::style_string::{self, PropertyMap};
use crate::types::{DocumentStyle, FillStyle, FontStyle, PatternKind};
use crate::units;

/// Encode a document style as a style string.
///
/// Emits `color`, `font-family`, `font-size` (pixels), `font-weight: bold`,
/// `font-style: italic`, and `background-color` (fill foreground falling
/// back to fill background). Properties whose source value is absent are
/// omitted entirely — never emitted as empty. An empty style yields "".
pub fn style_to_css(style: &DocumentStyle) -> String {
    let mut props = PropertyMap::new();

    if let Some(font) = &style.font {
        if let Some(css) = font.color.as_deref().and_then(color::packed_to_css_hex) {
            props.insert("color".to_string(), css);
        }
        if let Some(name) = font.name.as_deref() {
            let stack = fonts::resolve_font_stack(name);
            props.insert("font-family".to_string(), fonts::font_family_css(&stack));
        }
        if let Some(px) = font.size.and_then(units::points_to_pixels) {
            props.insert("font-size".to_string(), units::format_pixels(px));
        }
        if font.bold {
            props.insert("font-weight".to_string(), "bold".to_string());
        }
        if font.italic {
            props.insert("font-style".to_string(), "italic".to_string());
        }
    }

    if let Some(fill) = &style.fill {
        if let Some(css) = fill.effective_color().and_then(color::packed_to_css_hex) {
            props.insert("background-color".to_string(), css);
        }
    }

    if props.is_empty() {
        String::new()
    } else {
        style_string::serialize(&props)
    }
}

/// Decode a style string back into a document style.
///
/// Returns `None` when no recognized property produced any field, so a
/// meaningless string can never turn into a no-op style object that
/// overwrites real formatting with nothing.
pub fn css_to_style(css: &str) -> Option<DocumentStyle> {
    let props = style_string::parse(css);

    let mut font = FontStyle::default();

    if let Some(value) = props.get("color") {
        font.color = color::css_hex_to_packed(value);
    }
    if let Some(value) = props.get("font-family") {
        font.name = fonts::first_family(value);
    }
    if let Some(value) = props.get("font-size") {
        font.size = parse_pixel_size(value).and_then(units::pixels_to_points);
    }
    if let Some(value) = props.get("font-weight") {
        font.bold = matches!(value.trim(), "bold" | "700");
    }
    if let Some(value) = props.get("font-style") {
        font.italic = value.trim() == "italic";
    }

    let fill = props
        .get("background-color")
        .and_then(|value| color::css_hex_to_packed(value))
        .map(|packed| FillStyle {
            pattern: PatternKind::Solid,
            fg_color: Some(packed),
            bg_color: None,
        });

    let style = DocumentStyle {
        font: if font.is_empty() { None } else { Some(font) },
        fill,
    };

    if style.is_empty() {
        None
    } else {
        Some(style)
    }
}

/// Parse a CSS pixel length ("16px", "16.67px", bare "16") into a number.
fn parse_pixel_size(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    let parsed: f64 = digits.parse().ok()?;
    if parsed.is_finite() {
        Some(parsed)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::style_string::parse;

    fn full_style() -> DocumentStyle {
        DocumentStyle {
            font: Some(FontStyle {
                name: Some("Calibri".to_string()),
                size: Some(12.0),
                color: Some("FFFF0000".to_string()),
                bold: true,
                italic: false,
            }),
            fill: Some(FillStyle {
                pattern: PatternKind::Solid,
                fg_color: Some("FFFFFF00".to_string()),
                bg_color: None,
            }),
        }
    }

    #[test]
    fn test_encode_full_style() {
        let css = style_to_css(&full_style());
        let props = parse(&css);

        assert!(props
            .get("color")
            .is_some_and(|c| c.eq_ignore_ascii_case("#ff0000")));
        assert!(props
            .get("font-family")
            .is_some_and(|f| f.starts_with("Calibri")));
        assert_eq!(props.get("font-size").map(String::as_str), Some("16px"));
        assert_eq!(props.get("font-weight").map(String::as_str), Some("bold"));
        assert!(!props.contains_key("font-style"));
        assert!(props
            .get("background-color")
            .is_some_and(|c| c.eq_ignore_ascii_case("#ffff00")));
    }

    #[test]
    fn test_encode_omits_absent_properties() {
        let style = DocumentStyle {
            font: Some(FontStyle {
                italic: true,
                ..FontStyle::default()
            }),
            fill: None,
        };
        let props = parse(&style_to_css(&style));
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("font-style").map(String::as_str), Some("italic"));
    }

    #[test]
    fn test_encode_empty_style_is_empty_string() {
        assert_eq!(style_to_css(&DocumentStyle::default()), "");
    }

    #[test]
    fn test_fill_falls_back_to_background_color() {
        let style = DocumentStyle {
            font: None,
            fill: Some(FillStyle {
                pattern: PatternKind::Solid,
                fg_color: None,
                bg_color: Some("FF00FF00".to_string()),
            }),
        };
        let props = parse(&style_to_css(&style));
        assert!(props
            .get("background-color")
            .is_some_and(|c| c.eq_ignore_ascii_case("#00ff00")));
    }

    #[test]
    fn test_decode_round_trip() {
        let css = style_to_css(&full_style());
        let decoded = css_to_style(&css).unwrap();

        let font = decoded.font.unwrap();
        assert_eq!(font.name.as_deref(), Some("Calibri"));
        assert_eq!(font.color.as_deref(), Some("FFFF0000"));
        assert!(font.bold);
        assert!(!font.italic);
        let size = font.size.unwrap();
        assert!((size - 12.0).abs() <= 0.01);

        let fill = decoded.fill.unwrap();
        assert_eq!(fill.fg_color.as_deref(), Some("FFFFFF00"));
    }

    #[test]
    fn test_decode_bold_numeric_weight() {
        let style = css_to_style("font-weight: 700").unwrap();
        assert!(style.font.unwrap().bold);
        // non-bold weights don't produce a style at all
        assert!(css_to_style("font-weight: normal").is_none());
        assert!(css_to_style("font-weight: 400").is_none());
    }

    #[test]
    fn test_decode_unquotes_family() {
        let style = css_to_style("font-family: \"Times New Roman\", serif").unwrap();
        assert_eq!(
            style.font.unwrap().name.as_deref(),
            Some("Times New Roman")
        );
    }

    #[test]
    fn test_decode_unrecognized_yields_none() {
        assert!(css_to_style("").is_none());
        assert!(css_to_style("text-align: center").is_none());
        assert!(css_to_style("color: notahexcolor").is_none());
    }

    #[test]
    fn test_decode_background_only_has_no_font() {
        let style = css_to_style("background-color: #ffff00").unwrap();
        assert!(style.font.is_none());
        assert!(style.fill.is_some());
    }
}
