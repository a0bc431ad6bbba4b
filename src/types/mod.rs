//! Core data types shared across the reader, writer, and style codecs.

mod content;
mod grid;
mod style;

pub use content::CellContent;
pub use grid::{Grid, StyleMap};
pub use style::{DocumentStyle, FillStyle, FontStyle, PatternKind};
