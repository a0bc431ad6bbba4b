//! Editing session state and open supersession.
//!
//! A [`DocumentSession`] owns the current grid and style map. Opens are
//! asynchronous from the caller's point of view: a ticket is taken before
//! decoding starts, and the decoded result is applied only if no newer
//! open has been started in the meantime. The losing open is dropped
//! without touching session state.

use crate::error::Result;
use crate::reader::DocumentData;
use crate::style_string::{self, PropertyMap};
use crate::types::{Grid, StyleMap};
use crate::writer;

/// Handle for one in-flight open. Valid until the next [`begin_open`].
///
/// [`begin_open`]: DocumentSession::begin_open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTicket {
    generation: u64,
}

/// Owns the editable document state.
#[derive(Debug)]
pub struct DocumentSession {
    grid: Grid,
    styles: StyleMap,
    generation: u64,
}

impl DocumentSession {
    /// A fresh session holding an empty 1x1 grid and no styles.
    pub fn new() -> Self {
        Self {
            grid: Grid::default(),
            styles: StyleMap::new(),
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Start an open, superseding any open still in flight.
    pub fn begin_open(&mut self) -> OpenTicket {
        self.generation += 1;
        OpenTicket {
            generation: self.generation,
        }
    }

    /// True when the ticket belongs to the most recent open.
    pub fn is_current(&self, ticket: OpenTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a decode result for the given open.
    ///
    /// Grid and styles are replaced together, and only when the ticket is
    /// still current. Returns whether the result was applied.
    pub fn complete_open(&mut self, ticket: OpenTicket, data: DocumentData) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.grid = data.grid;
        self.styles = data.styles;
        true
    }

    /// Replace the grid in place, keeping styles. Used by hosts that edit
    /// cell values without round-tripping through a document.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// Merge property updates into one cell's style string.
    ///
    /// Untouched properties of that cell survive, and no other cell's
    /// entry is affected.
    pub fn apply_cell_style(&mut self, addr: &str, updates: &PropertyMap) {
        if updates.is_empty() {
            return;
        }
        let existing = self.styles.get(addr).map(String::as_str).unwrap_or("");
        let merged = style_string::merge(existing, updates);
        self.styles.insert(addr.to_string(), merged);
    }

    /// Serialize the session to xlsx bytes. Session state is untouched
    /// whether or not serialization succeeds.
    pub fn save(&self) -> Result<Vec<u8>> {
        writer::write_document(&self.grid, &self.styles)
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
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

    fn loaded_data(marker: &str) -> DocumentData {
        DocumentData {
            grid: Grid::from_rows(vec![vec![marker.to_string()]]),
            styles: StyleMap::new(),
        }
    }

    #[test]
    fn test_new_session_is_empty_grid() {
        let session = DocumentSession::new();
        assert_eq!(session.grid().row_count(), 1);
        assert_eq!(session.grid().col_count(), 1);
        assert_eq!(session.grid().get(0, 0), Some(""));
        assert!(session.styles().is_empty());
    }

    #[test]
    fn test_current_open_applies() {
        let mut session = DocumentSession::new();
        let ticket = session.begin_open();
        assert!(session.complete_open(ticket, loaded_data("first")));
        assert_eq!(session.grid().get(0, 0), Some("first"));
    }

    #[test]
    fn test_superseded_open_is_dropped() {
        let mut session = DocumentSession::new();
        let first = session.begin_open();
        let second = session.begin_open();

        assert!(!session.is_current(first));
        assert!(!session.complete_open(first, loaded_data("stale")));
        assert_eq!(session.grid().get(0, 0), Some(""));

        assert!(session.complete_open(second, loaded_data("fresh")));
        assert_eq!(session.grid().get(0, 0), Some("fresh"));
    }

    #[test]
    fn test_completion_consumes_currency() {
        let mut session = DocumentSession::new();
        let ticket = session.begin_open();
        assert!(session.complete_open(ticket, loaded_data("a")));
        // Same ticket again is still current: generation only moves on
        // begin_open, and re-applying the same open is harmless.
        assert!(session.is_current(ticket));
    }

    #[test]
    fn test_apply_cell_style_merges() {
        let mut session = DocumentSession::new();
        let mut updates = PropertyMap::new();
        updates.insert("color".to_string(), "red".to_string());
        session.apply_cell_style("A1", &updates);

        let mut more = PropertyMap::new();
        more.insert("font-weight".to_string(), "bold".to_string());
        session.apply_cell_style("A1", &more);

        let css = session.styles().get("A1").unwrap();
        let props = style_string::parse(css);
        assert_eq!(props.get("color").map(String::as_str), Some("red"));
        assert_eq!(props.get("font-weight").map(String::as_str), Some("bold"));
    }

    #[test]
    fn test_apply_cell_style_is_per_address() {
        let mut session = DocumentSession::new();
        let mut updates = PropertyMap::new();
        updates.insert("color".to_string(), "red".to_string());
        session.apply_cell_style("A1", &updates);

        let mut other = PropertyMap::new();
        other.insert("color".to_string(), "blue".to_string());
        session.apply_cell_style("B2", &other);

        assert_eq!(session.styles().get("A1").unwrap(), "color: red");
        assert_eq!(session.styles().get("B2").unwrap(), "color: blue");
    }

    #[test]
    fn test_empty_update_leaves_map_alone() {
        let mut session = DocumentSession::new();
        session.apply_cell_style("A1", &PropertyMap::new());
        assert!(session.styles().is_empty());
    }

    #[test]
    fn test_save_round_trips_through_reader() {
        let mut session = DocumentSession::new();
        session.replace_grid(Grid::from_rows(vec![vec![
            "hello".to_string(),
            "42".to_string(),
        ]]));
        let bytes = session.save().unwrap();

        let data = crate::reader::read_document(&bytes).unwrap();
        assert_eq!(data.grid.get(0, 0), Some("hello"));
        assert_eq!(data.grid.get(0, 1), Some("42"));
    }
}
