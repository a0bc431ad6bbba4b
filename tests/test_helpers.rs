#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    dead_code
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

const EMPTY_SHEET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData/>
</worksheet>"#;

/// Builder for in-memory xlsx fixtures.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheet_xml: Option<String>,
    shared_strings_xml: Option<String>,
    styles_xml: Option<String>,
    sheet_rels_xml: Option<String>,
    date1904: bool,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw worksheet XML (full part, including the declaration).
    pub fn sheet(mut self, xml: &str) -> Self {
        self.sheet_xml = Some(xml.to_string());
        self
    }

    /// Set the worksheet from `<sheetData>` inner content.
    pub fn sheet_data(self, inner: &str) -> Self {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>{inner}</sheetData>
</worksheet>"#
        );
        self.sheet(&xml)
    }

    /// Set sharedStrings.xml from `<si>` entries.
    pub fn shared_strings(mut self, entries: &str) -> Self {
        self.shared_strings_xml = Some(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{entries}</sst>"#
        ));
        self
    }

    /// Set styles.xml (full part body inside `<styleSheet>`).
    pub fn styles(mut self, inner: &str) -> Self {
        self.styles_xml = Some(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{inner}</styleSheet>"#
        ));
        self
    }

    /// Set the sheet's relationship part from `<Relationship>` entries.
    pub fn sheet_rels(mut self, entries: &str) -> Self {
        self.sheet_rels_xml = Some(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
        ));
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let workbook_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <workbookPr date1904="{}"/>
  <sheets>
    <sheet name="Sheet1" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#,
            if self.date1904 { "1" } else { "0" }
        );

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            let mut part = |name: &str, content: &str| {
                zip.start_file(name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            };

            part("[Content_Types].xml", CONTENT_TYPES_XML);
            part("_rels/.rels", RELS_XML);
            part("xl/workbook.xml", &workbook_xml);
            part("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML);
            part(
                "xl/worksheets/sheet1.xml",
                self.sheet_xml.as_deref().unwrap_or(EMPTY_SHEET_XML),
            );
            if let Some(sst) = &self.shared_strings_xml {
                part("xl/sharedStrings.xml", sst);
            }
            if let Some(styles) = &self.styles_xml {
                part("xl/styles.xml", styles);
            }
            if let Some(rels) = &self.sheet_rels_xml {
                part("xl/worksheets/_rels/sheet1.xml.rels", rels);
            }

            zip.finish().unwrap();
        }
        buffer.into_inner()
    }
}

/// Minimal valid xlsx with an empty sheet and no optional parts.
pub fn create_minimal_xlsx() -> Vec<u8> {
    XlsxBuilder::new().build()
}

/// A styles part with one extra font/fill/xf beyond the defaults.
///
/// xf 0 is the default; xf 1 is bold red 12pt Calibri on a yellow fill;
/// xf 2 is the builtin date format (numFmtId 14).
pub fn styled_styles_part() -> &'static str {
    r#"<fonts count="2">
  <font><sz val="11"/><name val="Calibri"/></font>
  <font><b/><sz val="12"/><color rgb="FFFF0000"/><name val="Calibri"/></font>
</fonts>
<fills count="3">
  <fill><patternFill patternType="none"/></fill>
  <fill><patternFill patternType="gray125"/></fill>
  <fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/></patternFill></fill>
</fills>
<borders count="1"><border/></borders>
<cellXfs count="3">
  <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  <xf numFmtId="0" fontId="1" fillId="2" borderId="0" applyFont="1" applyFill="1"/>
  <xf numFmtId="14" fontId="0" fillId="0" borderId="0" applyNumberFormat="1"/>
</cellXfs>"#
}
