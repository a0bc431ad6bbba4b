//! Worksheet parsing — walks sheet XML into classified cells.
//!
//! Each `<c>` element becomes a [`CellContent`] variant plus an optional
//! style index. The sheet's declared bounds and the observed cell extents
//! are both tracked so the dense grid can cover every populated cell.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_ref, parse_cell_ref_bytes_or_default};
use crate::datetime;
use crate::error::Result;
use crate::types::CellContent;

use super::strings::SharedEntry;
use super::styles::StyleTable;

/// One parsed cell with its grid position.
#[derive(Debug)]
pub(crate) struct SheetCell {
    pub row: u32,
    pub col: u32,
    pub content: CellContent,
    pub style_idx: Option<u32>,
}

/// Parsed sheet: sparse cells plus the bounds the dense grid must cover.
#[derive(Debug, Default)]
pub(crate) struct SheetData {
    pub cells: Vec<SheetCell>,
    /// Declared row count (dimension / row elements), before clamping.
    pub declared_rows: u32,
    /// Widest observed cell count in any row.
    pub max_cols: u32,
    /// Highest row index actually holding a cell, 1-based count.
    pub populated_rows: u32,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    IsoDate,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::IsoDate,
        _ => CellTypeTag::Default,
    }
}

fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    seen.then_some(num)
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Attribute lookup by local name, for namespace-prefixed attributes
/// like `r:id`.
fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Raw formula data from an `<f>` element.
#[derive(Debug, Default)]
struct RawFormula {
    expr: String,
    shared_index: Option<u32>,
}

/// Hyperlink entry from the sheet's `<hyperlinks>` section.
#[derive(Debug)]
struct RawHyperlink {
    cell_ref: String,
    r_id: Option<String>,
    location: Option<String>,
    display: Option<String>,
}

/// Parse a single worksheet into classified cells.
#[allow(clippy::too_many_lines)]
pub(crate) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[SharedEntry],
    styles: &StyleTable,
    date1904: bool,
    hyperlink_targets: &HashMap<String, String>,
) -> Result<SheetData> {
    let file = archive.by_name(path)?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut sheet = SheetData::default();
    let mut hyperlinks: Vec<RawHyperlink> = Vec::new();
    // Master formula text per shared-formula group index.
    let mut shared_formulas: HashMap<u32, String> = HashMap::new();

    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();
    let mut text_buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start_event = matches!(event, Event::Start(_));

                match e.local_name().as_ref() {
                    b"dimension" => {
                        if let Some((_, end_row)) = attr_string(e, b"ref")
                            .as_deref()
                            .and_then(parse_dimension_end)
                        {
                            sheet.declared_rows = sheet.declared_rows.max(end_row + 1);
                        }
                    }
                    b"row" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"r" {
                                if let Some(r) = parse_u32_bytes(&attr.value) {
                                    sheet.declared_rows = sheet.declared_rows.max(r);
                                }
                            }
                        }
                    }
                    b"c" => {
                        let mut row: u32 = 0;
                        let mut col: u32 = 0;
                        let mut type_tag = CellTypeTag::Default;
                        let mut style_idx: Option<u32> = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    let (c, r) = parse_cell_ref_bytes_or_default(&attr.value);
                                    col = c;
                                    row = r;
                                }
                                b"t" => type_tag = parse_cell_type_tag(&attr.value),
                                b"s" => style_idx = parse_u32_bytes(&attr.value),
                                _ => {}
                            }
                        }

                        let mut value: Option<String> = None;
                        let mut inline_runs: Vec<String> = Vec::new();
                        let mut saw_inline_run = false;
                        let mut formula: Option<RawFormula> = None;

                        if is_start_event {
                            read_cell_children(
                                &mut xml,
                                &mut cell_buf,
                                &mut text_buf,
                                &mut value,
                                &mut inline_runs,
                                &mut saw_inline_run,
                                &mut formula,
                            )?;
                        }

                        let content = classify_cell(
                            formula,
                            type_tag,
                            value,
                            inline_runs,
                            saw_inline_run,
                            shared_strings,
                            styles,
                            style_idx,
                            date1904,
                            &mut shared_formulas,
                        );

                        sheet.max_cols = sheet.max_cols.max(col + 1);
                        sheet.populated_rows = sheet.populated_rows.max(row + 1);
                        sheet.cells.push(SheetCell {
                            row,
                            col,
                            content,
                            style_idx,
                        });
                    }
                    b"hyperlink" => {
                        if let Some(cell_ref) = attr_string(e, b"ref") {
                            hyperlinks.push(RawHyperlink {
                                cell_ref,
                                r_id: attr_string_local(e, b"id"),
                                location: attr_string(e, b"location"),
                                display: attr_string(e, b"display"),
                            });
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    apply_hyperlinks(&mut sheet, &hyperlinks, hyperlink_targets);
    Ok(sheet)
}

/// Read the child elements of a non-empty `<c>` element.
fn read_cell_children<B: std::io::BufRead>(
    xml: &mut Reader<B>,
    cell_buf: &mut Vec<u8>,
    text_buf: &mut Vec<u8>,
    value: &mut Option<String>,
    inline_runs: &mut Vec<String>,
    saw_inline_run: &mut bool,
    formula: &mut Option<RawFormula>,
) -> Result<()> {
    loop {
        cell_buf.clear();
        match xml.read_event_into(cell_buf) {
            Ok(Event::Start(ref inner)) => match inner.local_name().as_ref() {
                b"v" => {
                    text_buf.clear();
                    if let Ok(Event::Text(text)) = xml.read_event_into(text_buf) {
                        *value = text.unescape().ok().map(|s| s.into_owned());
                    }
                }
                b"f" => {
                    let shared_index = attr_string(inner, b"si").and_then(|s| s.parse().ok());
                    text_buf.clear();
                    let expr = match xml.read_event_into(text_buf) {
                        Ok(Event::Text(text)) => {
                            text.unescape().map(|s| s.into_owned()).unwrap_or_default()
                        }
                        _ => String::new(),
                    };
                    *formula = Some(RawFormula { expr, shared_index });
                }
                b"is" => read_inline_string(xml, text_buf, inline_runs, saw_inline_run)?,
                _ => {}
            },
            Ok(Event::Empty(ref inner)) => {
                if inner.local_name().as_ref() == b"f" {
                    // Shared-formula reference without text: <f t="shared" si="0"/>
                    let shared_index = attr_string(inner, b"si").and_then(|s| s.parse().ok());
                    *formula = Some(RawFormula {
                        expr: String::new(),
                        shared_index,
                    });
                }
            }
            Ok(Event::End(ref inner)) => {
                if inner.local_name().as_ref() == b"c" {
                    return Ok(());
                }
            }
            Ok(Event::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }
}

/// Read an inline string container `<is>...</is>`, collecting `<t>` runs.
fn read_inline_string<B: std::io::BufRead>(
    xml: &mut Reader<B>,
    text_buf: &mut Vec<u8>,
    runs: &mut Vec<String>,
    saw_run: &mut bool,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref inner)) => match inner.local_name().as_ref() {
                b"r" => *saw_run = true,
                b"t" => {
                    text_buf.clear();
                    match xml.read_event_into(text_buf) {
                        Ok(Event::Text(text)) => {
                            runs.push(text.unescape().map(|s| s.into_owned()).unwrap_or_default());
                        }
                        Ok(Event::End(_)) => runs.push(String::new()),
                        _ => {}
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref inner)) => {
                if inner.local_name().as_ref() == b"t" {
                    runs.push(String::new());
                }
            }
            Ok(Event::End(ref inner)) => {
                if inner.local_name().as_ref() == b"is" {
                    return Ok(());
                }
            }
            Ok(Event::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }
}

/// Classify a cell's raw pieces into a single [`CellContent`] variant.
///
/// The precedence lives here, once: formula first, then the typed string
/// forms, then numbers/dates, then empty.
#[allow(clippy::too_many_arguments)]
fn classify_cell(
    formula: Option<RawFormula>,
    type_tag: CellTypeTag,
    value: Option<String>,
    inline_runs: Vec<String>,
    saw_inline_run: bool,
    shared_strings: &[SharedEntry],
    styles: &StyleTable,
    style_idx: Option<u32>,
    date1904: bool,
    shared_formulas: &mut HashMap<u32, String>,
) -> CellContent {
    if let Some(raw) = formula {
        // Prefer the direct formula text; fall back to the shared-formula
        // master recorded for this group.
        if !raw.expr.is_empty() {
            if let Some(si) = raw.shared_index {
                shared_formulas.entry(si).or_insert_with(|| raw.expr.clone());
            }
            return CellContent::Formula { expr: raw.expr };
        }
        if let Some(expr) = raw.shared_index.and_then(|si| shared_formulas.get(&si)) {
            return CellContent::Formula { expr: expr.clone() };
        }
    }

    match type_tag {
        CellTypeTag::Shared => {
            let idx: usize = value.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0);
            match shared_strings.get(idx) {
                Some(SharedEntry::Rich(runs)) => CellContent::RichText(runs.clone()),
                Some(SharedEntry::Plain(text)) => CellContent::Text(text.clone()),
                None => CellContent::Empty,
            }
        }
        CellTypeTag::Inline => {
            if saw_inline_run && inline_runs.len() > 1 {
                CellContent::RichText(inline_runs)
            } else {
                CellContent::Text(inline_runs.concat())
            }
        }
        CellTypeTag::Str => CellContent::Text(value.unwrap_or_default()),
        CellTypeTag::Bool => match value.as_deref() {
            Some("1" | "true") => CellContent::Text("TRUE".to_string()),
            Some("0" | "false") => CellContent::Text("FALSE".to_string()),
            other => CellContent::Text(other.unwrap_or_default().to_string()),
        },
        CellTypeTag::Error => match value {
            Some(result) => CellContent::CachedResult(result),
            None => CellContent::Empty,
        },
        CellTypeTag::IsoDate => CellContent::Text(value.unwrap_or_default()),
        CellTypeTag::Default => {
            let Some(v) = value else {
                return CellContent::Empty;
            };
            match v.parse::<f64>() {
                Ok(num) if num.is_finite() => {
                    let is_date = style_idx
                        .and_then(|idx| styles.get(idx))
                        .map_or(false, |xf| xf.is_date);
                    // A date-formatted cell whose value cannot be a serial
                    // degrades to a plain number.
                    if is_date && datetime::in_supported_range(num) {
                        CellContent::Date {
                            serial: num,
                            date1904,
                        }
                    } else {
                        CellContent::Number(num)
                    }
                }
                _ => CellContent::Text(v),
            }
        }
    }
}

/// Parse the end corner of a dimension ref like "A1:C10" into (col, row).
fn parse_dimension_end(ref_str: &str) -> Option<(u32, u32)> {
    let end = ref_str.split_once(':').map_or(ref_str, |(_, end)| end);
    parse_cell_ref(end)
}

/// Fold the sheet's hyperlinks into the matching cells.
///
/// A hyperlinked cell keeps its own text as the display value; a cell
/// with no text of its own falls back to the link's display attribute,
/// then to the target. Formula and rich-text cells are left alone.
fn apply_hyperlinks(
    sheet: &mut SheetData,
    hyperlinks: &[RawHyperlink],
    targets: &HashMap<String, String>,
) {
    for link in hyperlinks {
        let Some((col, row)) = parse_cell_ref(&link.cell_ref) else {
            continue;
        };
        let target = link
            .r_id
            .as_ref()
            .and_then(|rid| targets.get(rid).cloned())
            .or_else(|| link.location.clone());
        let Some(target) = target else {
            continue;
        };

        if let Some(cell) = sheet
            .cells
            .iter_mut()
            .find(|cell| cell.row == row && cell.col == col)
        {
            match &cell.content {
                CellContent::Text(text) if !text.is_empty() => {
                    cell.content = CellContent::Hyperlink {
                        display: Some(text.clone()),
                        target,
                    };
                }
                CellContent::Text(_) | CellContent::Empty => {
                    cell.content = CellContent::Hyperlink {
                        display: link.display.clone(),
                        target,
                    };
                }
                _ => {}
            }
        } else {
            // Hyperlink on a cell with no <c> element at all
            sheet.max_cols = sheet.max_cols.max(col + 1);
            sheet.populated_rows = sheet.populated_rows.max(row + 1);
            sheet.cells.push(SheetCell {
                row,
                col,
                content: CellContent::Hyperlink {
                    display: link.display.clone(),
                    target,
                },
                style_idx: None,
            });
        }
    }
}
