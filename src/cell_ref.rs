//! Cell address utilities: "A1"-style references and 0-based (row, col) pairs.
//!
//! The canonical textual form is column letters + 1-based row number.
//! `parse_cell_ref` and `format_cell_ref` are inverses for every
//! non-negative (row, col) pair.

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            col = col * 26 + (upper as u32 - 'A' as u32 + 1);
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row * 10 + (ch as u32 - '0' as u32);
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row {
        return None;
    }

    Some((col.saturating_sub(1), row.saturating_sub(1)))
}

/// Parse a cell reference from raw bytes (ASCII) into (col, row), 0-indexed.
///
/// Bytes equivalent of [`parse_cell_ref`] for use with raw XML attribute
/// values (e.g., `attr.value` from quick-xml).
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            let upper = if b.is_ascii_lowercase() { b - 32 } else { b };
            col = col * 26 + (u32::from(upper - b'A') + 1);
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row * 10 + u32::from(b - b'0');
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row {
        return None;
    }

    Some((col.saturating_sub(1), row.saturating_sub(1)))
}

/// Parse a cell reference from bytes with defaults.
///
/// Returns `(0, 0)` if parsing fails.
pub fn parse_cell_ref_bytes_or_default(ref_bytes: &[u8]) -> (u32, u32) {
    parse_cell_ref_bytes(ref_bytes).unwrap_or((0, 0))
}

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...)
#[allow(clippy::cast_possible_truncation)]
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col + 1; // Convert to 1-based
    while n > 0 {
        n -= 1;
        let c = char::from(b'A' + (n % 26) as u8);
        result.insert(0, c);
        n /= 26;
    }
    result
}

/// Format a 0-based (row, col) pair as a canonical "A1"-style reference.
pub fn format_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
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
    use test_case::test_case;

    #[test_case("A1", (0, 0))]
    #[test_case("B3", (1, 2))]
    #[test_case("Z10", (25, 9))]
    #[test_case("AA1", (26, 0))]
    #[test_case("AB2", (27, 1))]
    #[test_case("$C$5", (2, 4))]
    #[test_case("xfd7", (16383, 6))]
    fn test_parse_cell_ref(input: &str, expected: (u32, u32)) {
        assert_eq!(parse_cell_ref(input), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_cell_ref(""), None);
        assert_eq!(parse_cell_ref("123"), None);
        assert_eq!(parse_cell_ref("ABC"), None);
        assert_eq!(parse_cell_ref("A1:B2"), None);
    }

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(51), "AZ");
        assert_eq!(col_to_letter(52), "BA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
    }

    #[test]
    fn test_format_parse_inverse() {
        for row in [0_u32, 1, 9, 99, 1_048_575] {
            for col in [0_u32, 1, 25, 26, 701, 702, 16_383] {
                let text = format_cell_ref(row, col);
                assert_eq!(
                    parse_cell_ref(&text),
                    Some((col, row)),
                    "round trip failed for {text}"
                );
            }
        }
    }

    #[test]
    fn test_bytes_matches_str() {
        for r in ["A1", "AA99", "$B$2", "zz1000"] {
            assert_eq!(parse_cell_ref_bytes(r.as_bytes()), parse_cell_ref(r));
        }
    }
}
