//! Shared string table parsing.
//!
//! Entries are either plain text or rich-text run lists. Run formatting is
//! discarded at this boundary — the grid only ever sees flattened text —
//! but the run structure is kept so the cell classifier can tag the
//! content as rich text.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::error::Result;

/// One `<si>` entry from sharedStrings.xml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SharedEntry {
    Plain(String),
    Rich(Vec<String>),
}

impl SharedEntry {
    pub(crate) fn flattened(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Rich(runs) => runs.concat(),
        }
    }
}

/// Parse xl/sharedStrings.xml. A missing part yields an empty table.
pub(crate) fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<SharedEntry>> {
    let file = match archive.by_name("xl/sharedStrings.xml") {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut text_buf = Vec::new();

    let mut runs: Vec<String> = Vec::new();
    let mut saw_run = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    runs.clear();
                    saw_run = false;
                }
                b"r" => saw_run = true,
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => {
                    text_buf.clear();
                    match xml.read_event_into(&mut text_buf) {
                        Ok(Event::Text(text)) => {
                            runs.push(text.unescape().map(|s| s.into_owned()).unwrap_or_default());
                        }
                        // Immediately-closed <t></t>
                        Ok(Event::End(_)) => runs.push(String::new()),
                        _ => {}
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"t" && !in_phonetic {
                    runs.push(String::new());
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    if saw_run {
                        entries.push(SharedEntry::Rich(std::mem::take(&mut runs)));
                    } else {
                        entries.push(SharedEntry::Plain(runs.concat()));
                        runs.clear();
                    }
                }
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}
