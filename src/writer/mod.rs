//! Document writing — dense grid plus style map in, xlsx bytes out.
//!
//! Produces a minimal single-sheet package: content types, package and
//! workbook relationships, workbook, deduplicated stylesheet, and one
//! worksheet. Strings are written inline, so no shared string table is
//! emitted.

mod sheet;
mod styles;

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::types::{Grid, StyleMap};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Serialize the grid and style map as a complete xlsx package.
pub fn write_document(grid: &Grid, styles: &StyleMap) -> Result<Vec<u8>> {
    let mut style_builder = styles::StyleBuilder::new();
    let sheet_xml = sheet::render_sheet(grid, styles, &mut style_builder);
    let styles_xml = style_builder.render();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    write_part(&mut zip, options, "[Content_Types].xml", CONTENT_TYPES)?;
    write_part(&mut zip, options, "_rels/.rels", ROOT_RELS)?;
    write_part(&mut zip, options, "xl/workbook.xml", WORKBOOK)?;
    write_part(&mut zip, options, "xl/_rels/workbook.xml.rels", WORKBOOK_RELS)?;
    write_part(&mut zip, options, "xl/styles.xml", &styles_xml)?;
    write_part(&mut zip, options, "xl/worksheets/sheet1.xml", &sheet_xml)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

/// Escape text for XML element and attribute content.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
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
    use std::io::Read;
    use zip::ZipArchive;

    fn part_text(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_package_has_all_parts() {
        let bytes = write_document(&Grid::default(), &StyleMap::new()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_sheet_part_carries_grid_content() {
        let grid = Grid::from_rows(vec![vec!["hello".to_string(), "42".to_string()]]);
        let bytes = write_document(&grid, &StyleMap::new()).unwrap();
        let sheet = part_text(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("hello"));
        assert!(sheet.contains("<v>42</v>"));
    }

    #[test]
    fn test_styles_part_carries_registered_style() {
        let grid = Grid::new(1, 1);
        let mut styles = StyleMap::new();
        styles.insert(
            "A1".to_string(),
            "color: #ff0000; font-weight: bold".to_string(),
        );
        let bytes = write_document(&grid, &styles).unwrap();
        let styles_xml = part_text(&bytes, "xl/styles.xml");
        assert!(styles_xml.contains(r#"<color rgb="FFFF0000"/>"#));
        assert!(styles_xml.contains("<b/>"));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&apos;");
        assert_eq!(xml_escape("plain"), "plain");
    }
}
