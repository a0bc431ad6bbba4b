//! Document reading — xlsx bytes in, dense grid plus style map out.
//!
//! The reader opens the first sheet of the workbook, classifies every
//! cell, renders each cell's display text into a rectangular [`Grid`],
//! and collects per-cell style strings keyed by A1 address.

mod strings;
mod styles;
mod worksheet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::format_cell_ref;
use crate::error::Result;
use crate::style_codec;
use crate::types::{Grid, StyleMap};

/// Everything the editor needs from a parsed document.
#[derive(Debug, Default, Serialize)]
pub struct DocumentData {
    pub grid: Grid,
    pub styles: StyleMap,
}

/// Parse an xlsx document from raw bytes.
///
/// Only the first sheet in workbook order is read. An empty or cell-less
/// sheet still yields a 1x1 grid holding a single empty string.
pub fn read_document(bytes: &[u8]) -> Result<DocumentData> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let workbook = parse_workbook(&mut archive)?;
    let sheet_path = resolve_sheet_path(&mut archive, workbook.first_sheet_rid.as_deref())?;

    let shared_strings = strings::parse_shared_strings(&mut archive)?;
    let style_table = styles::parse_styles(&mut archive)?;
    let hyperlink_targets = parse_sheet_rels(&mut archive, &sheet_path)?;

    let sheet = worksheet::parse_sheet(
        &mut archive,
        &sheet_path,
        &shared_strings,
        &style_table,
        workbook.date1904,
        &hyperlink_targets,
    )?;

    let rows = to_usize(sheet.declared_rows.max(sheet.populated_rows).max(1));
    let cols = to_usize(sheet.max_cols.max(1));

    let mut grid = Grid::new(rows, cols);
    let mut style_map = StyleMap::new();

    for cell in &sheet.cells {
        grid.set(
            to_usize(cell.row),
            to_usize(cell.col),
            cell.content.display(),
        );

        let css = cell
            .style_idx
            .and_then(|idx| style_table.get(idx))
            .map(|xf| style_codec::style_to_css(&xf.style))
            .unwrap_or_default();
        if !css.is_empty() {
            style_map.insert(format_cell_ref(cell.row, cell.col), css);
        }
    }

    Ok(DocumentData {
        grid,
        styles: style_map,
    })
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[derive(Debug, Default)]
struct WorkbookInfo {
    first_sheet_rid: Option<String>,
    date1904: bool,
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

/// Parse xl/workbook.xml for the first sheet's relationship id and the
/// date system flag.
fn parse_workbook<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<WorkbookInfo> {
    let file = match archive.by_name("xl/workbook.xml") {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(WorkbookInfo::default()),
        Err(e) => return Err(e.into()),
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut info = WorkbookInfo::default();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"sheet" => {
                    if info.first_sheet_rid.is_none() {
                        info.first_sheet_rid = attr_string_local(e, b"id");
                    }
                }
                b"workbookPr" => {
                    info.date1904 = attr_string(e, b"date1904")
                        .map_or(false, |v| v == "1" || v == "true");
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// Resolve the first sheet's part path through the workbook relationships.
///
/// Falls back to the conventional `xl/worksheets/sheet1.xml` when the
/// relationship cannot be resolved.
fn resolve_sheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    rid: Option<&str>,
) -> Result<String> {
    const DEFAULT_PATH: &str = "xl/worksheets/sheet1.xml";

    let Some(rid) = rid else {
        return Ok(DEFAULT_PATH.to_string());
    };

    let rels = parse_relationships(archive, "xl/_rels/workbook.xml.rels")?;
    let Some(target) = rels.get(rid) else {
        return Ok(DEFAULT_PATH.to_string());
    };

    // Absolute targets are package-rooted; relative ones resolve against xl/.
    let path = if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("xl/{target}")
    };
    Ok(path)
}

/// Parse hyperlink targets from the sheet's relationship part.
///
/// Only external-mode relationships carry a usable target URL; internal
/// links are handled via the hyperlink element's `location` attribute.
fn parse_sheet_rels<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_path: &str,
) -> Result<HashMap<String, String>> {
    let rels_path = rels_path_for(sheet_path);
    parse_relationships(archive, &rels_path)
}

/// Relationship part path for a given part: `dir/_rels/name.rels`.
fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/_rels/{name}.rels"),
        None => format!("_rels/{part_path}.rels"),
    }
}

/// Parse a `.rels` part into an id -> target map. Missing part is fine.
fn parse_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<HashMap<String, String>> {
    let file = match archive.by_name(path) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut rels = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    if let (Some(id), Some(target)) =
                        (attr_string(e, b"Id"), attr_string(e, b"Target"))
                    {
                        rels.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}
