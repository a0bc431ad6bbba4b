#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use xlbridge::read_document_data as read_document;
use xlbridge::style_string;
use xlbridge::types::{Grid, StyleMap};
use xlbridge::write_document_bytes as write_document;

fn round_trip(grid: &Grid, styles: &StyleMap) -> xlbridge::DocumentData {
    let bytes = write_document(grid, styles).unwrap();
    read_document(&bytes).unwrap()
}

#[test]
fn test_empty_grid_round_trips_to_unit_grid() {
    let data = round_trip(&Grid::default(), &StyleMap::new());
    assert_eq!(data.grid, Grid::default());
    assert!(data.styles.is_empty());
}

#[test]
fn test_values_survive_round_trip() {
    let grid = Grid::from_rows(vec![
        vec!["hello".to_string(), "42".to_string(), "3.5".to_string()],
        vec!["".to_string(), "world".to_string(), "".to_string()],
    ]);
    let data = round_trip(&grid, &StyleMap::new());
    assert_eq!(data.grid, grid);
}

#[test]
fn test_formula_survives_round_trip() {
    let grid = Grid::from_rows(vec![vec![
        "1".to_string(),
        "2".to_string(),
        "=A1+B1".to_string(),
    ]]);
    let data = round_trip(&grid, &StyleMap::new());
    assert_eq!(data.grid.get(0, 2), Some("=A1+B1"));
}

#[test]
fn test_numeric_looking_text_stays_text() {
    let grid = Grid::from_rows(vec![vec!["42abc".to_string(), "1e400".to_string()]]);
    let data = round_trip(&grid, &StyleMap::new());
    // "42abc" does not parse; "1e400" overflows to infinity, so both are
    // written and read back as text.
    assert_eq!(data.grid.get(0, 0), Some("42abc"));
    assert_eq!(data.grid.get(0, 1), Some("1e400"));
}

#[test]
fn test_full_style_round_trip() {
    let grid = Grid::from_rows(vec![vec!["styled".to_string()]]);
    let mut styles = StyleMap::new();
    styles.insert(
        "A1".to_string(),
        "color: #ff0000; font-family: Calibri; font-size: 16px; font-weight: bold; background-color: #ffff00"
            .to_string(),
    );

    let data = round_trip(&grid, &styles);
    let css = data.styles.get("A1").unwrap();
    let props = style_string::parse(css);

    assert!(props
        .get("color")
        .is_some_and(|c| c.eq_ignore_ascii_case("#ff0000")));
    assert!(props
        .get("font-family")
        .is_some_and(|f| f.starts_with("Calibri")));
    assert_eq!(props.get("font-size").map(String::as_str), Some("16px"));
    assert_eq!(props.get("font-weight").map(String::as_str), Some("bold"));
    assert!(props
        .get("background-color")
        .is_some_and(|c| c.eq_ignore_ascii_case("#ffff00")));
}

#[test]
fn test_italic_round_trip() {
    let grid = Grid::from_rows(vec![vec!["i".to_string()]]);
    let mut styles = StyleMap::new();
    styles.insert("A1".to_string(), "font-style: italic".to_string());

    let data = round_trip(&grid, &styles);
    let props = style_string::parse(data.styles.get("A1").unwrap());
    assert_eq!(props.get("font-style").map(String::as_str), Some("italic"));
}

#[test]
fn test_short_hex_color_round_trips_expanded() {
    let grid = Grid::from_rows(vec![vec!["c".to_string()]]);
    let mut styles = StyleMap::new();
    styles.insert("A1".to_string(), "color: #f00".to_string());

    let data = round_trip(&grid, &styles);
    let props = style_string::parse(data.styles.get("A1").unwrap());
    assert!(props
        .get("color")
        .is_some_and(|c| c.eq_ignore_ascii_case("#ff0000")));
}

#[test]
fn test_styles_on_different_cells_stay_separate() {
    let grid = Grid::from_rows(vec![vec!["a".to_string(), "b".to_string()]]);
    let mut styles = StyleMap::new();
    styles.insert("A1".to_string(), "color: #ff0000".to_string());
    styles.insert("B1".to_string(), "color: #0000ff".to_string());

    let data = round_trip(&grid, &styles);
    let a = style_string::parse(data.styles.get("A1").unwrap());
    let b = style_string::parse(data.styles.get("B1").unwrap());
    assert!(a.get("color").is_some_and(|c| c.eq_ignore_ascii_case("#ff0000")));
    assert!(b.get("color").is_some_and(|c| c.eq_ignore_ascii_case("#0000ff")));
}

#[test]
fn test_unrecognized_style_string_is_dropped() {
    let grid = Grid::from_rows(vec![vec!["x".to_string()]]);
    let mut styles = StyleMap::new();
    styles.insert("A1".to_string(), "text-align: center".to_string());

    let data = round_trip(&grid, &styles);
    assert!(data.styles.is_empty());
}

#[test]
fn test_style_on_empty_cell_survives() {
    let grid = Grid::new(2, 2);
    let mut styles = StyleMap::new();
    styles.insert("B2".to_string(), "font-weight: bold".to_string());

    let data = round_trip(&grid, &styles);
    assert_eq!(data.grid.row_count(), 2);
    assert_eq!(data.grid.col_count(), 2);
    let props = style_string::parse(data.styles.get("B2").unwrap());
    assert_eq!(props.get("font-weight").map(String::as_str), Some("bold"));
}

#[test]
fn test_wide_grid_addresses_past_column_z() {
    let mut grid = Grid::new(1, 28);
    grid.set(0, 26, "aa".to_string());
    grid.set(0, 27, "ab".to_string());

    let data = round_trip(&grid, &StyleMap::new());
    assert_eq!(data.grid.col_count(), 28);
    assert_eq!(data.grid.get(0, 26), Some("aa"));
    assert_eq!(data.grid.get(0, 27), Some("ab"));
}

#[test]
fn test_negative_and_fractional_numbers() {
    let grid = Grid::from_rows(vec![vec![
        "-7".to_string(),
        "0.125".to_string(),
        "1e3".to_string(),
    ]]);
    let data = round_trip(&grid, &StyleMap::new());
    assert_eq!(data.grid.get(0, 0), Some("-7"));
    assert_eq!(data.grid.get(0, 1), Some("0.125"));
    // Scientific notation normalizes to the plain decimal form.
    assert_eq!(data.grid.get(0, 2), Some("1000"));
}

#[test]
fn test_special_characters_survive_round_trip() {
    let grid = Grid::from_rows(vec![vec![
        "a < b & \"c\"".to_string(),
        "tab\tand\nnewline".to_string(),
    ]]);
    let data = round_trip(&grid, &StyleMap::new());
    assert_eq!(data.grid.get(0, 0), Some("a < b & \"c\""));
    assert_eq!(data.grid.get(0, 1), Some("tab\tand\nnewline"));
}
