#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod test_helpers;

use test_helpers::{create_minimal_xlsx, styled_styles_part, XlsxBuilder};
use xlbridge::read_document_data as read_document;
use xlbridge::style_string;

#[test]
fn test_empty_document_yields_unit_grid() {
    let data = read_document(&create_minimal_xlsx()).unwrap();
    assert_eq!(data.grid.row_count(), 1);
    assert_eq!(data.grid.col_count(), 1);
    assert_eq!(data.grid.get(0, 0), Some(""));
    assert!(data.styles.is_empty());
}

#[test]
fn test_inline_and_numeric_cells() {
    let bytes = XlsxBuilder::new()
        .sheet_data(
            r#"<row r="1">
  <c r="A1" t="inlineStr"><is><t>hello</t></is></c>
  <c r="B1"><v>42</v></c>
  <c r="C1"><v>3.5</v></c>
</row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("hello"));
    assert_eq!(data.grid.get(0, 1), Some("42"));
    assert_eq!(data.grid.get(0, 2), Some("3.5"));
}

#[test]
fn test_integral_numbers_drop_decimal_point() {
    let bytes = XlsxBuilder::new()
        .sheet_data(r#"<row r="1"><c r="A1"><v>42.0</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("42"));
}

#[test]
fn test_shared_strings() {
    let bytes = XlsxBuilder::new()
        .shared_strings("<si><t>alpha</t></si><si><t>beta</t></si>")
        .sheet_data(
            r#"<row r="1"><c r="A1" t="s"><v>1</v></c><c r="B1" t="s"><v>0</v></c></row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("beta"));
    assert_eq!(data.grid.get(0, 1), Some("alpha"));
}

#[test]
fn test_rich_text_flattens_to_concatenated_runs() {
    let bytes = XlsxBuilder::new()
        .shared_strings("<si><r><t>Hello </t></r><r><t>World</t></r></si>")
        .sheet_data(r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("Hello World"));
}

#[test]
fn test_formula_renders_with_leading_equals() {
    let bytes = XlsxBuilder::new()
        .sheet_data(r#"<row r="1"><c r="C1"><f>A1+B1</f><v>7</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 2), Some("=A1+B1"));
}

#[test]
fn test_shared_formula_resolves_from_master() {
    let bytes = XlsxBuilder::new()
        .sheet_data(
            r#"<row r="1">
  <c r="A1"><f t="shared" ref="A1:A2" si="0">B1*2</f><v>2</v></c>
</row>
<row r="2">
  <c r="A2"><f t="shared" si="0"/><v>4</v></c>
</row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("=B1*2"));
    // Follower cells inherit the group master's text
    assert_eq!(data.grid.get(1, 0), Some("=B1*2"));
}

#[test]
fn test_error_cell_shows_cached_result() {
    let bytes = XlsxBuilder::new()
        .sheet_data(r#"<row r="1"><c r="A1" t="e"><v>#DIV/0!</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("#DIV/0!"));
}

#[test]
fn test_boolean_cells() {
    let bytes = XlsxBuilder::new()
        .sheet_data(
            r#"<row r="1"><c r="A1" t="b"><v>1</v></c><c r="B1" t="b"><v>0</v></c></row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("TRUE"));
    assert_eq!(data.grid.get(0, 1), Some("FALSE"));
}

#[test]
fn test_date_cell_renders_iso() {
    let bytes = XlsxBuilder::new()
        .styles(styled_styles_part())
        .sheet_data(r#"<row r="1"><c r="A1" s="2"><v>45292</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("2024-01-01"));
}

#[test]
fn test_date_cell_1904_system() {
    let bytes = XlsxBuilder::new()
        .date1904()
        .styles(styled_styles_part())
        .sheet_data(r#"<row r="1"><c r="A1" s="2"><v>0</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("1904-01-01"));
}

#[test]
fn test_out_of_range_date_serial_falls_back_to_number() {
    let bytes = XlsxBuilder::new()
        .styles(styled_styles_part())
        .sheet_data(
            r#"<row r="1">
  <c r="A1" s="2"><v>1e18</v></c>
  <c r="B1" s="2"><v>-5</v></c>
</row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("1000000000000000000"));
    assert_eq!(data.grid.get(0, 1), Some("-5"));
}

#[test]
fn test_unstyled_serial_stays_numeric() {
    let bytes = XlsxBuilder::new()
        .styles(styled_styles_part())
        .sheet_data(r#"<row r="1"><c r="A1"><v>45292</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("45292"));
}

#[test]
fn test_styled_cell_produces_style_entry() {
    let bytes = XlsxBuilder::new()
        .styles(styled_styles_part())
        .sheet_data(r#"<row r="1"><c r="B1" s="1" t="inlineStr"><is><t>x</t></is></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();

    let css = data.styles.get("B1").unwrap();
    let props = style_string::parse(css);
    assert!(props
        .get("color")
        .is_some_and(|c| c.eq_ignore_ascii_case("#ff0000")));
    assert_eq!(props.get("font-weight").map(String::as_str), Some("bold"));
    assert_eq!(props.get("font-size").map(String::as_str), Some("16px"));
    assert!(props
        .get("font-family")
        .is_some_and(|f| f.starts_with("Calibri")));
    assert!(props
        .get("background-color")
        .is_some_and(|c| c.eq_ignore_ascii_case("#ffff00")));
}

#[test]
fn test_default_styled_cell_has_no_entry() {
    let bytes = XlsxBuilder::new()
        .styles(styled_styles_part())
        .sheet_data(r#"<row r="1"><c r="A1" s="0" t="inlineStr"><is><t>x</t></is></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert!(data.styles.is_empty());
}

#[test]
fn test_hyperlink_displays_cell_text() {
    let bytes = XlsxBuilder::new()
        .shared_strings("<si><t>Click here</t></si>")
        .sheet_rels(
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>"#,
        )
        .sheet(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
  </sheetData>
  <hyperlinks>
    <hyperlink ref="A1" r:id="rId1"/>
  </hyperlinks>
</worksheet>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("Click here"));
}

#[test]
fn test_hyperlink_without_text_falls_back_to_target() {
    let bytes = XlsxBuilder::new()
        .sheet_rels(
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>"#,
        )
        .sheet(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheetData/>
  <hyperlinks>
    <hyperlink ref="B2" r:id="rId1"/>
  </hyperlinks>
</worksheet>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(1, 1), Some("https://example.com"));
}

#[test]
fn test_grid_covers_declared_dimension() {
    let bytes = XlsxBuilder::new()
        .sheet(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <dimension ref="A1:C5"/>
  <sheetData>
    <row r="1"><c r="A1"><v>1</v></c></row>
  </sheetData>
</worksheet>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.row_count(), 5);
    assert_eq!(data.grid.col_count(), 1);
    assert_eq!(data.grid.get(4, 0), Some(""));
}

#[test]
fn test_multi_letter_columns() {
    let bytes = XlsxBuilder::new()
        .sheet_data(r#"<row r="1"><c r="AA1"><v>27</v></c></row>"#)
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.col_count(), 27);
    assert_eq!(data.grid.get(0, 26), Some("27"));
}

#[test]
fn test_sparse_cells_leave_gaps_empty() {
    let bytes = XlsxBuilder::new()
        .sheet_data(
            r#"<row r="2"><c r="B2" t="inlineStr"><is><t>mid</t></is></c></row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.row_count(), 2);
    assert_eq!(data.grid.col_count(), 2);
    assert_eq!(data.grid.get(0, 0), Some(""));
    assert_eq!(data.grid.get(0, 1), Some(""));
    assert_eq!(data.grid.get(1, 0), Some(""));
    assert_eq!(data.grid.get(1, 1), Some("mid"));
}

#[test]
fn test_escaped_text_is_unescaped() {
    let bytes = XlsxBuilder::new()
        .sheet_data(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>a &lt; b &amp; c</t></is></c></row>"#,
        )
        .build();
    let data = read_document(&bytes).unwrap();
    assert_eq!(data.grid.get(0, 0), Some("a < b & c"));
}

#[test]
fn test_garbage_input_is_an_error() {
    assert!(read_document(b"not a zip archive").is_err());
    assert!(read_document(&[]).is_err());
}
