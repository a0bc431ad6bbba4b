//! Tagged cell content, built once at the document-reader boundary.
//!
//! The reader classifies each cell into exactly one variant; a single
//! exhaustive match in [`CellContent::display`] then produces the grid's
//! display string. This makes the precedence order (formula > rich text >
//! hyperlink > cached result > date > scalar) explicit instead of an
//! implicit if/else cascade.

use crate::datetime;

/// What a cell holds, as far as the grid interchange cares.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Formula text without the leading `=` marker.
    Formula { expr: String },
    /// Rich text runs, in order; per-run formatting is already discarded.
    RichText(Vec<String>),
    /// A hyperlinked cell. `display` is the text shown in the cell when
    /// one exists; the target is the fallback.
    Hyperlink {
        display: Option<String>,
        target: String,
    },
    /// A cached result carried without a stored value (e.g. `#DIV/0!`).
    CachedResult(String),
    /// A date/time serial in the document's date system.
    Date { serial: f64, date1904: bool },
    /// A plain number.
    Number(f64),
    /// A plain string.
    Text(String),
    /// No stored value.
    Empty,
}

impl CellContent {
    /// Produce the display string the grid shows for this cell.
    ///
    /// Never returns anything the grid cannot hold: missing values
    /// normalize to the empty string.
    pub fn display(&self) -> String {
        match self {
            Self::Formula { expr } => format!("={expr}"),
            Self::RichText(runs) => runs.concat(),
            Self::Hyperlink { display, target } => display
                .clone()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| target.clone()),
            Self::CachedResult(result) => result.clone(),
            Self::Date { serial, date1904 } => datetime::serial_to_iso(*serial, *date1904),
            Self::Number(n) => format_number(*n),
            Self::Text(text) => text.clone(),
            Self::Empty => String::new(),
        }
    }
}

/// Format a numeric cell value the way the grid displays it: integral
/// values without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_keeps_marker() {
        let content = CellContent::Formula {
            expr: "A1+B1".to_string(),
        };
        assert_eq!(content.display(), "=A1+B1");
    }

    #[test]
    fn test_rich_text_flattens_runs() {
        let content = CellContent::RichText(vec![
            "Hello ".to_string(),
            "bold".to_string(),
            " world".to_string(),
        ]);
        assert_eq!(content.display(), "Hello bold world");
    }

    #[test]
    fn test_hyperlink_prefers_display_text() {
        let with_text = CellContent::Hyperlink {
            display: Some("Docs".to_string()),
            target: "https://example.com".to_string(),
        };
        assert_eq!(with_text.display(), "Docs");

        let bare = CellContent::Hyperlink {
            display: None,
            target: "https://example.com".to_string(),
        };
        assert_eq!(bare.display(), "https://example.com");

        let empty_text = CellContent::Hyperlink {
            display: Some(String::new()),
            target: "https://example.com".to_string(),
        };
        assert_eq!(empty_text.display(), "https://example.com");
    }

    #[test]
    fn test_cached_result_passes_through() {
        let content = CellContent::CachedResult("#DIV/0!".to_string());
        assert_eq!(content.display(), "#DIV/0!");
    }

    #[test]
    fn test_numbers_drop_integral_fraction() {
        assert_eq!(CellContent::Number(42.0).display(), "42");
        assert_eq!(CellContent::Number(-7.0).display(), "-7");
        assert_eq!(CellContent::Number(3.25).display(), "3.25");
    }

    #[test]
    fn test_empty_is_empty_string() {
        assert_eq!(CellContent::Empty.display(), "");
    }

    #[test]
    fn test_date_renders_iso() {
        // Serial 45292 = 2024-01-01 in the 1900 system
        let content = CellContent::Date {
            serial: 45292.0,
            date1904: false,
        };
        assert_eq!(content.display(), "2024-01-01");
    }
}
