//! styles.xml generation with deduplicated fonts, fills and cellXfs.
//!
//! Every distinct cell style registered with the builder gets one cellXf;
//! identical styles share a single entry. Slot 0 of each table is the
//! workbook default, and fills additionally reserve slot 1 for the
//! `gray125` sentinel that consumers expect to find there.

use std::collections::HashMap;

use crate::types::{DocumentStyle, FillStyle, FontStyle};

/// Accumulates styles during sheet generation and renders styles.xml.
#[derive(Debug)]
pub(crate) struct StyleBuilder {
    fonts: Vec<FontStyle>,
    fills: Vec<Option<FillStyle>>,
    xfs: Vec<(usize, usize)>,
    font_keys: HashMap<String, usize>,
    fill_keys: HashMap<String, usize>,
    xf_keys: HashMap<(usize, usize), usize>,
}

impl StyleBuilder {
    pub(crate) fn new() -> Self {
        let mut builder = Self {
            fonts: vec![FontStyle::default()],
            // fills[0] = none, fills[1] = gray125, both reserved
            fills: vec![None, None],
            xfs: vec![(0, 0)],
            font_keys: HashMap::new(),
            fill_keys: HashMap::new(),
            xf_keys: HashMap::new(),
        };
        builder.font_keys.insert(font_key(&FontStyle::default()), 0);
        builder.xf_keys.insert((0, 0), 0);
        builder
    }

    /// Register a style, returning the cellXf index to reference from the
    /// cell's `s` attribute.
    pub(crate) fn register(&mut self, style: &DocumentStyle) -> usize {
        let font_id = match &style.font {
            Some(font) if !font.is_empty() => self.intern_font(font),
            _ => 0,
        };
        let fill_id = match &style.fill {
            Some(fill) => self.intern_fill(fill),
            None => 0,
        };

        if let Some(&idx) = self.xf_keys.get(&(font_id, fill_id)) {
            return idx;
        }
        let idx = self.xfs.len();
        self.xfs.push((font_id, fill_id));
        self.xf_keys.insert((font_id, fill_id), idx);
        idx
    }

    fn intern_font(&mut self, font: &FontStyle) -> usize {
        let key = font_key(font);
        if let Some(&idx) = self.font_keys.get(&key) {
            return idx;
        }
        let idx = self.fonts.len();
        self.fonts.push(font.clone());
        self.font_keys.insert(key, idx);
        idx
    }

    fn intern_fill(&mut self, fill: &FillStyle) -> usize {
        let Some(color) = fill.effective_color() else {
            return 0;
        };
        let key = color.to_string();
        if let Some(&idx) = self.fill_keys.get(&key) {
            return idx;
        }
        let idx = self.fills.len();
        self.fills.push(Some(fill.clone()));
        self.fill_keys.insert(key, idx);
        idx
    }

    /// Render the accumulated tables as a complete styles.xml part.
    pub(crate) fn render(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        xml.push_str(&format!("<fonts count=\"{}\">", self.fonts.len()));
        for font in &self.fonts {
            render_font(&mut xml, font);
        }
        xml.push_str("</fonts>");

        xml.push_str(&format!("<fills count=\"{}\">", self.fills.len()));
        xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
        xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
        for fill in self.fills.iter().skip(2).flatten() {
            render_fill(&mut xml, fill);
        }
        xml.push_str("</fills>");

        xml.push_str(r#"<borders count="1"><border/></borders>"#);
        xml.push_str(r#"<cellStyleXfs count="1"><xf/></cellStyleXfs>"#);

        xml.push_str(&format!("<cellXfs count=\"{}\">", self.xfs.len()));
        for &(font_id, fill_id) in &self.xfs {
            xml.push_str(&format!(
                "<xf numFmtId=\"0\" fontId=\"{font_id}\" fillId=\"{fill_id}\" borderId=\"0\""
            ));
            if font_id > 0 {
                xml.push_str(" applyFont=\"1\"");
            }
            if fill_id > 1 {
                xml.push_str(" applyFill=\"1\"");
            }
            xml.push_str("/>");
        }
        xml.push_str("</cellXfs>");

        xml.push_str("</styleSheet>");
        xml
    }
}

fn render_font(xml: &mut String, font: &FontStyle) {
    xml.push_str("<font>");
    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if let Some(size) = font.size.filter(|v| v.is_finite()) {
        xml.push_str(&format!("<sz val=\"{}\"/>", format_size(size)));
    }
    if let Some(color) = &font.color {
        xml.push_str(&format!("<color rgb=\"{color}\"/>"));
    }
    if let Some(name) = &font.name {
        xml.push_str(&format!("<name val=\"{}\"/>", super::xml_escape(name)));
    }
    xml.push_str("</font>");
}

fn render_fill(xml: &mut String, fill: &FillStyle) {
    xml.push_str("<fill><patternFill patternType=\"solid\">");
    if let Some(color) = fill.effective_color() {
        xml.push_str(&format!("<fgColor rgb=\"{color}\"/>"));
    }
    xml.push_str("</patternFill></fill>");
}

/// Format a font size without a trailing `.0` on whole points.
fn format_size(size: f64) -> String {
    if size.fract().abs() < f64::EPSILON {
        #[allow(clippy::cast_possible_truncation)]
        let whole = size as i64;
        whole.to_string()
    } else {
        size.to_string()
    }
}

/// Deduplicated key for a font. Sizes are compared on their rendered form
/// so 12 and 12.0 intern to the same entry.
fn font_key(font: &FontStyle) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        font.name.as_deref().unwrap_or(""),
        font.size.map(format_size).unwrap_or_default(),
        font.color.as_deref().unwrap_or(""),
        font.bold,
        font.italic,
    )
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
    use crate::types::PatternKind;

    fn bold_red() -> DocumentStyle {
        DocumentStyle {
            font: Some(FontStyle {
                color: Some("FFFF0000".to_string()),
                bold: true,
                ..FontStyle::default()
            }),
            fill: None,
        }
    }

    #[test]
    fn test_default_slots_are_reserved() {
        let builder = StyleBuilder::new();
        let xml = builder.render();
        assert!(xml.contains(r#"<fonts count="1">"#));
        assert!(xml.contains(r#"<fills count="2">"#));
        assert!(xml.contains(r#"patternType="none""#));
        assert!(xml.contains(r#"patternType="gray125""#));
        assert!(xml.contains(r#"<cellXfs count="1">"#));
    }

    #[test]
    fn test_identical_styles_share_one_xf() {
        let mut builder = StyleBuilder::new();
        let a = builder.register(&bold_red());
        let b = builder.register(&bold_red());
        assert_eq!(a, b);
        assert_eq!(a, 1);
    }

    #[test]
    fn test_distinct_styles_get_distinct_xfs() {
        let mut builder = StyleBuilder::new();
        let a = builder.register(&bold_red());
        let b = builder.register(&DocumentStyle {
            font: Some(FontStyle {
                italic: true,
                ..FontStyle::default()
            }),
            fill: None,
        });
        assert_ne!(a, b);
    }

    #[test]
    fn test_fill_lands_after_reserved_slots() {
        let mut builder = StyleBuilder::new();
        builder.register(&DocumentStyle {
            font: None,
            fill: Some(FillStyle {
                pattern: PatternKind::Solid,
                fg_color: Some("FFFFFF00".to_string()),
                bg_color: None,
            }),
        });
        let xml = builder.render();
        assert!(xml.contains(r#"<fgColor rgb="FFFFFF00"/>"#));
        assert!(xml.contains(r#"fillId="2""#));
    }

    #[test]
    fn test_font_rendering() {
        let mut builder = StyleBuilder::new();
        builder.register(&DocumentStyle {
            font: Some(FontStyle {
                name: Some("Calibri".to_string()),
                size: Some(12.0),
                color: Some("FF0000FF".to_string()),
                bold: true,
                italic: true,
            }),
            fill: None,
        });
        let xml = builder.render();
        assert!(xml.contains("<b/>"));
        assert!(xml.contains("<i/>"));
        assert!(xml.contains(r#"<sz val="12"/>"#));
        assert!(xml.contains(r#"<color rgb="FF0000FF"/>"#));
        assert!(xml.contains(r#"<name val="Calibri"/>"#));
    }
}
