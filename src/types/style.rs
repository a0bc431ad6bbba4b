//! The native style objects read from and written to the document format.

use serde::{Deserialize, Serialize};

/// Font portion of a document style.
///
/// `size` is in points; `color` is a packed 8-digit ARGB string
/// (see [`crate::color`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    /// True when no field carries information.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.size.is_none() && self.color.is_none()
            && !self.bold
            && !self.italic
    }
}

/// Fill pattern kind. Only solid fills round-trip; anything else read from
/// a document is degraded to solid on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    #[default]
    Solid,
}

/// Fill portion of a document style. Colors are packed ARGB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub pattern: PatternKind,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
}

impl FillStyle {
    /// The color a solid fill paints with: foreground first, background
    /// as fallback.
    pub fn effective_color(&self) -> Option<&str> {
        self.fg_color.as_deref().or(self.bg_color.as_deref())
    }
}

/// The internal document style: one representation, with thin adapters at
/// the read/write boundaries for the packed-color variants the format uses.
///
/// Absent components mean "no data" — the writer only ever sets the
/// components present here and never clears siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStyle {
    pub font: Option<FontStyle>,
    pub fill: Option<FillStyle>,
}

impl DocumentStyle {
    pub fn is_empty(&self) -> bool {
        self.font.as_ref().map_or(true, FontStyle::is_empty) && self.fill.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_effective_color_prefers_foreground() {
        let fill = FillStyle {
            pattern: PatternKind::Solid,
            fg_color: Some("FFFF0000".to_string()),
            bg_color: Some("FF00FF00".to_string()),
        };
        assert_eq!(fill.effective_color(), Some("FFFF0000"));

        let bg_only = FillStyle {
            fg_color: None,
            ..fill
        };
        assert_eq!(bg_only.effective_color(), Some("FF00FF00"));
    }

    #[test]
    fn test_emptiness() {
        assert!(DocumentStyle::default().is_empty());
        let styled = DocumentStyle {
            font: Some(FontStyle {
                bold: true,
                ..FontStyle::default()
            }),
            fill: None,
        };
        assert!(!styled.is_empty());
    }
}
