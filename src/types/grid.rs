//! The editable grid snapshot and its sparse style map.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Sparse mapping from canonical cell address ("A1") to style string.
///
/// Absence of a key means "no explicit style", not "empty style".
pub type StyleMap = BTreeMap<String, String>;

/// A rectangular, row-major grid of display values.
///
/// Always at least 1x1; every row has the same column count. The grid
/// stores display strings only — a formula is a value starting with `=`,
/// nothing is ever `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

// Deserialization funnels through `from_rows` so external input (the WASM
// boundary deserializes caller-supplied grids) cannot produce an empty or
// ragged grid.
impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Vec<String>>::deserialize(deserializer).map(Self::from_rows)
    }
}

impl Grid {
    /// Create an empty grid of the given dimensions (clamped to >= 1x1).
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows: vec![vec![String::new(); cols]; rows],
        }
    }

    /// Build a grid from possibly-ragged rows, padding short rows with
    /// empty strings so the result is rectangular. Empty input becomes 1x1.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
        if rows.is_empty() {
            rows.push(Vec::new());
        }
        for row in &mut rows {
            row.resize(cols, String::new());
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Set a cell value. Out-of-bounds writes are ignored; the grid never
    /// grows implicitly.
    pub fn set(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(1, 1)
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

    #[test]
    fn test_minimum_dimensions() {
        let grid = Grid::new(0, 0);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.col_count(), 1);
        assert_eq!(grid.get(0, 0), Some(""));
    }

    #[test]
    fn test_from_rows_pads_ragged_input() {
        let grid = Grid::from_rows(vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.get(0, 2), Some(""));
        assert_eq!(grid.get(1, 2), Some("d"));
    }

    #[test]
    fn test_from_rows_empty_input() {
        let grid = Grid::from_rows(Vec::new());
        assert_eq!((grid.row_count(), grid.col_count()), (1, 1));
    }

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut grid = Grid::new(2, 2);
        grid.set(5, 5, "x".to_string());
        assert_eq!(grid.get(5, 5), None);
        grid.set(1, 1, "y".to_string());
        assert_eq!(grid.get(1, 1), Some("y"));
    }

    #[test]
    fn test_deserialize_empty_becomes_unit_grid() {
        let grid: Grid = serde_json::from_str("[]").unwrap();
        assert_eq!((grid.row_count(), grid.col_count()), (1, 1));
        assert_eq!(grid.get(0, 0), Some(""));
    }

    #[test]
    fn test_deserialize_pads_ragged_rows() {
        let grid: Grid = serde_json::from_str(r#"[["a"],["b","c"]]"#).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 2);
        assert_eq!(grid.get(0, 1), Some(""));
        assert_eq!(grid.get(1, 1), Some("c"));
    }

    #[test]
    fn test_serialize_is_plain_row_arrays() {
        let json = serde_json::to_string(&Grid::from_rows(vec![vec!["a".to_string()]])).unwrap();
        assert_eq!(json, r#"[["a"]]"#);
    }

    #[test]
    fn test_rectangular_invariant() {
        let grid = Grid::from_rows(vec![Vec::new(), vec!["x".to_string(); 4], Vec::new()]);
        for row in grid.rows() {
            assert_eq!(row.len(), grid.col_count());
        }
    }
}
