//! styles.xml parsing.
//!
//! Resolves each cellXf into the internal [`DocumentStyle`] plus a
//! date-format flag. Only the attributes the interchange round-trips are
//! read (font name/size/color/bold/italic, pattern fill colors, number
//! format date-ness); borders, alignment and the rest are dropped here by
//! policy.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::color;
use crate::datetime;
use crate::error::Result;
use crate::types::{DocumentStyle, FillStyle, FontStyle, PatternKind};

/// A resolved cellXf entry.
#[derive(Debug, Clone, Default)]
pub(crate) struct XfStyle {
    pub style: DocumentStyle,
    pub is_date: bool,
}

/// Resolved style table, indexed by a cell's `s` attribute.
#[derive(Debug, Default)]
pub(crate) struct StyleTable {
    entries: Vec<XfStyle>,
}

impl StyleTable {
    pub(crate) fn get(&self, idx: u32) -> Option<&XfStyle> {
        self.entries.get(to_usize(idx))
    }
}

/// Raw fill colors before presence resolution.
#[derive(Debug, Default, Clone)]
struct RawFill {
    pattern_type: Option<String>,
    fg_color: Option<String>,
    bg_color: Option<String>,
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(ToString::to_string);
        }
    }
    None
}

fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.parse().ok())
}

fn attr_f64(e: &BytesStart, key: &[u8]) -> Option<f64> {
    attr_string(e, key).and_then(|s| s.parse().ok())
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Parse xl/styles.xml. A missing part yields an empty table.
#[allow(clippy::too_many_lines)]
pub(crate) fn parse_styles<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<StyleTable> {
    let file = match archive.by_name("xl/styles.xml") {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(StyleTable::default()),
        Err(e) => return Err(e.into()),
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<RawFill> = Vec::new();
    let mut num_fmts: HashMap<u32, String> = HashMap::new();
    let mut xfs: Vec<(Option<u32>, Option<u32>, Option<u32>)> = Vec::new();

    let mut in_font = false;
    let mut in_fill = false;
    let mut in_cell_xfs = false;
    let mut current_font = FontStyle::default();
    let mut current_fill = RawFill::default();

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_empty_event = matches!(event, Event::Empty(_));

                match e.local_name().as_ref() {
                    b"numFmt" => {
                        if let (Some(id), Some(code)) =
                            (attr_u32(e, b"numFmtId"), attr_string(e, b"formatCode"))
                        {
                            num_fmts.insert(id, code);
                        }
                    }
                    b"font" => {
                        current_font = FontStyle::default();
                        if is_empty_event {
                            fonts.push(std::mem::take(&mut current_font));
                        } else {
                            in_font = true;
                        }
                    }
                    b"name" if in_font => {
                        current_font.name = attr_string(e, b"val");
                    }
                    b"sz" if in_font => {
                        current_font.size = attr_f64(e, b"val").filter(|v| v.is_finite());
                    }
                    b"b" if in_font => {
                        current_font.bold =
                            attr_string(e, b"val").map_or(true, |v| v == "1" || v == "true");
                    }
                    b"i" if in_font => {
                        current_font.italic =
                            attr_string(e, b"val").map_or(true, |v| v == "1" || v == "true");
                    }
                    b"color" if in_font => {
                        current_font.color =
                            attr_string(e, b"rgb").and_then(|raw| color::normalize_packed(&raw));
                    }
                    b"fill" => {
                        current_fill = RawFill::default();
                        if is_empty_event {
                            fills.push(std::mem::take(&mut current_fill));
                        } else {
                            in_fill = true;
                        }
                    }
                    b"patternFill" if in_fill => {
                        current_fill.pattern_type = attr_string(e, b"patternType");
                    }
                    b"fgColor" if in_fill => {
                        current_fill.fg_color =
                            attr_string(e, b"rgb").and_then(|raw| color::normalize_packed(&raw));
                    }
                    b"bgColor" if in_fill => {
                        current_fill.bg_color =
                            attr_string(e, b"rgb").and_then(|raw| color::normalize_packed(&raw));
                    }
                    b"cellXfs" => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => {
                        xfs.push((
                            attr_u32(e, b"fontId"),
                            attr_u32(e, b"fillId"),
                            attr_u32(e, b"numFmtId"),
                        ));
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"font" => {
                    if in_font {
                        fonts.push(std::mem::take(&mut current_font));
                        in_font = false;
                    }
                }
                b"fill" => {
                    if in_fill {
                        fills.push(std::mem::take(&mut current_fill));
                        in_fill = false;
                    }
                }
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    let entries = xfs
        .iter()
        .map(|&(font_id, fill_id, num_fmt_id)| {
            let font = font_id
                .and_then(|id| fonts.get(to_usize(id)))
                .filter(|f| !f.is_empty())
                .cloned();

            let fill = fill_id
                .and_then(|id| fills.get(to_usize(id)))
                .filter(|f| has_pattern(f))
                .map(|f| FillStyle {
                    pattern: PatternKind::Solid,
                    fg_color: f.fg_color.clone(),
                    bg_color: f.bg_color.clone(),
                });

            let is_date = num_fmt_id.map_or(false, |id| {
                datetime::is_builtin_date_format(id)
                    || num_fmts
                        .get(&id)
                        .map_or(false, |code| datetime::is_date_format_code(code))
            });

            XfStyle {
                style: DocumentStyle { font, fill },
                is_date,
            }
        })
        .collect();

    Ok(StyleTable { entries })
}

/// True when a raw fill actually paints something. `none` and the default
/// `gray125` sentinel fill are treated as "no fill".
fn has_pattern(fill: &RawFill) -> bool {
    match fill.pattern_type.as_deref() {
        None | Some("none") => false,
        Some("gray125") => false,
        Some(_) => fill.fg_color.is_some() || fill.bg_color.is_some(),
    }
}
