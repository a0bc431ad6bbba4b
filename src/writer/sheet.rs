//! Worksheet XML generation.
//!
//! Serializes the dense grid into sheet XML, re-typing each cell from its
//! text: a leading `=` becomes a formula, parseable finite numbers become
//! numeric cells, and everything else is written as an inline string.
//! Cells that are empty and unstyled are omitted entirely.

use crate::cell_ref::{col_to_letter, format_cell_ref};
use crate::style_codec;
use crate::types::{Grid, StyleMap};

use super::styles::StyleBuilder;
use super::xml_escape;

/// Render the grid as a complete worksheet part, registering cell styles
/// with the builder as they are encountered.
pub(crate) fn render_sheet(grid: &Grid, styles: &StyleMap, builder: &mut StyleBuilder) -> String {
    let rows = grid.row_count();
    let cols = grid.col_count();

    let mut xml = String::with_capacity(256 + rows * cols * 16);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str(&format!(
        "<dimension ref=\"A1:{}{}\"/>",
        col_to_letter(to_u32(cols.saturating_sub(1))),
        rows
    ));
    xml.push_str("<sheetData>");

    for (row_idx, row) in grid.rows().enumerate() {
        let mut row_xml = String::new();
        for (col_idx, value) in row.iter().enumerate() {
            let addr = format_cell_ref(to_u32(row_idx), to_u32(col_idx));
            let style_idx = styles
                .get(&addr)
                .and_then(|css| style_codec::css_to_style(css))
                .map(|style| builder.register(&style));

            if value.is_empty() && style_idx.is_none() {
                continue;
            }
            render_cell(&mut row_xml, &addr, value, style_idx);
        }
        if !row_xml.is_empty() {
            xml.push_str(&format!("<row r=\"{}\">", row_idx + 1));
            xml.push_str(&row_xml);
            xml.push_str("</row>");
        }
    }

    xml.push_str("</sheetData>");
    xml.push_str("</worksheet>");
    xml
}

fn to_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn render_cell(xml: &mut String, addr: &str, value: &str, style_idx: Option<usize>) {
    let style_attr = style_idx
        .map(|idx| format!(" s=\"{idx}\""))
        .unwrap_or_default();

    if let Some(expr) = value.strip_prefix('=') {
        xml.push_str(&format!(
            "<c r=\"{addr}\"{style_attr}><f>{}</f></c>",
            xml_escape(expr)
        ));
        return;
    }

    if !value.is_empty() {
        if let Ok(num) = value.trim().parse::<f64>() {
            if num.is_finite() {
                xml.push_str(&format!("<c r=\"{addr}\"{style_attr}><v>{num}</v></c>"));
                return;
            }
        }
    }

    if value.is_empty() {
        // Styled but valueless cell
        xml.push_str(&format!("<c r=\"{addr}\"{style_attr}/>"));
    } else {
        xml.push_str(&format!(
            "<c r=\"{addr}\"{style_attr} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
            xml_escape(value)
        ));
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
    use crate::types::Grid;

    fn render(grid: &Grid, styles: &StyleMap) -> String {
        let mut builder = StyleBuilder::new();
        render_sheet(grid, styles, &mut builder)
    }

    #[test]
    fn test_empty_grid_has_no_cells() {
        let xml = render(&Grid::default(), &StyleMap::new());
        assert!(xml.contains("<sheetData></sheetData>"));
        assert!(xml.contains(r#"<dimension ref="A1:A1"/>"#));
    }

    #[test]
    fn test_formula_cell() {
        let grid = Grid::from_rows(vec![vec!["=A1+B1".to_string()]]);
        let xml = render(&grid, &StyleMap::new());
        assert!(xml.contains(r#"<c r="A1"><f>A1+B1</f></c>"#));
        assert!(!xml.contains("<v>"));
    }

    #[test]
    fn test_numeric_cell() {
        let grid = Grid::from_rows(vec![vec!["42".to_string(), " 3.5 ".to_string()]]);
        let xml = render(&grid, &StyleMap::new());
        assert!(xml.contains(r#"<c r="A1"><v>42</v></c>"#));
        assert!(xml.contains(r#"<c r="B1"><v>3.5</v></c>"#));
    }

    #[test]
    fn test_text_cell_is_inline_string() {
        let grid = Grid::from_rows(vec![vec!["42abc".to_string()]]);
        let xml = render(&grid, &StyleMap::new());
        assert!(xml.contains(r#"t="inlineStr""#));
        assert!(xml.contains("<t xml:space=\"preserve\">42abc</t>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let grid = Grid::from_rows(vec![vec!["a<b & \"c\"".to_string()]]);
        let xml = render(&grid, &StyleMap::new());
        assert!(xml.contains("a&lt;b &amp; &quot;c&quot;"));
    }

    #[test]
    fn test_styled_empty_cell_survives() {
        let grid = Grid::new(1, 2);
        let mut styles = StyleMap::new();
        styles.insert("B1".to_string(), "font-weight: bold".to_string());
        let xml = render(&grid, &styles);
        assert!(!xml.contains(r#"<c r="A1""#));
        assert!(xml.contains(r#"<c r="B1" s="1"/>"#));
    }

    #[test]
    fn test_unstyled_empty_rows_are_omitted() {
        let mut grid = Grid::new(3, 1);
        grid.set(2, 0, "x".to_string());
        let xml = render(&grid, &StyleMap::new());
        assert!(!xml.contains(r#"<row r="1">"#));
        assert!(!xml.contains(r#"<row r="2">"#));
        assert!(xml.contains(r#"<row r="3">"#));
    }
}
