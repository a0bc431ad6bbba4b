//! Excel serial date handling.
//!
//! Converts document date serials into ISO-8601 display strings and
//! classifies number formats as date/time formats. Serial 1 in the 1900
//! system is Jan 1, 1900; the format inherited Lotus 1-2-3's phantom
//! Feb 29, 1900 (serial 60), which the conversion accounts for. The 1904
//! system starts at Jan 1, 1904 with no leap-year bug.

/// Builtin numFmtIds that are date or time formats (ECMA-376 18.8.30).
const BUILTIN_DATE_FORMATS: [u32; 12] = [14, 15, 16, 17, 18, 19, 20, 21, 22, 45, 46, 47];

/// Highest day serial either system stores: Dec 31, 9999 in the 1900 system.
const MAX_SERIAL_DAYS: f64 = 2_958_465.0;

/// True when a serial lies in the range the converters support: day 0
/// through the end of year 9999. Values outside it (including non-finite
/// ones) are not dates, whatever the cell's number format claims.
pub fn in_supported_range(serial: f64) -> bool {
    serial.is_finite() && (0.0..MAX_SERIAL_DAYS + 1.0).contains(&serial)
}

/// True when a builtin numFmtId denotes a date/time format.
pub fn is_builtin_date_format(fmt_id: u32) -> bool {
    BUILTIN_DATE_FORMATS.contains(&fmt_id)
}

/// True when a custom format code renders dates or times.
///
/// Day/month/year/hour/second tokens count, but not inside quoted
/// literals, color/condition brackets, or escaped characters.
pub fn is_date_format_code(code: &str) -> bool {
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;

    for ch in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S'
                if !in_quotes && !in_brackets =>
            {
                return true;
            }
            _ => {}
        }
    }
    false
}

/// Render a date serial as ISO-8601: `YYYY-MM-DD`, or
/// `YYYY-MM-DDTHH:MM:SS` when the serial carries a time-of-day fraction.
/// Serials outside the supported range render as the empty string.
#[allow(clippy::cast_possible_truncation)]
pub fn serial_to_iso(serial: f64, date1904: bool) -> String {
    if !in_supported_range(serial) {
        return String::new();
    }
    let (year, month, day, hour, minute, second) = serial_to_components(serial, date1904);
    if serial.fract().abs() < 1e-9 {
        format!("{year:04}-{month:02}-{day:02}")
    } else {
        format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}")
    }
}

/// Convert a date serial to (year, month, day, hour, minute, second).
///
/// Callers must have checked [`in_supported_range`] first.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn serial_to_components(serial: f64, date1904: bool) -> (i32, u32, u32, u32, u32, u32) {
    let mut days = serial.floor() as i32;
    let time_frac = serial.fract().abs();

    let mut total_seconds = (time_frac * 86400.0).round() as u32;
    // A fraction close enough to midnight rounds to a full day; carry it
    // instead of rendering 24:00:00.
    if total_seconds >= 86_400 {
        days += 1;
        total_seconds = 0;
    }

    // Convert the serial to a Julian Day Number.
    // 1900 system: serial 1 = Jan 1, 1900 = JDN 2415021, with the phantom
    // Feb 29, 1900 at serial 60. 1904 system: serial 0 = Jan 1, 1904.
    let jdn = if date1904 {
        days + 2_416_481
    } else if days <= 60 {
        days + 2_415_020
    } else {
        days + 2_415_019
    };

    let (year, month, day) = jdn_to_ymd(jdn);

    let hour = total_seconds / 3600;
    let minute = (total_seconds % 3600) / 60;
    let second = total_seconds % 60;

    (year, month, day, hour, minute, second)
}

/// Julian Day Number to (year, month, day) in the proleptic Gregorian
/// calendar (Richards' algorithm).
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn jdn_to_ymd(jdn: i32) -> (i32, u32, u32) {
    let jdn = i64::from(jdn);

    let f = jdn + 1401 + (((4 * jdn + 274_277) / 146_097) * 3) / 4 - 38;
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;

    let day = (h % 153) / 5 + 1;
    let month = ((h / 153 + 2) % 12) + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month) / 12;

    (year as i32, month as u32, day as u32)
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

    #[test_case(1.0, "1900-01-01")]
    #[test_case(59.0, "1900-02-28")]
    #[test_case(61.0, "1900-03-01"; "after phantom leap day")]
    #[test_case(25569.0, "1970-01-01")]
    #[test_case(45292.0, "2024-01-01")]
    #[test_case(36526.0, "2000-01-01")]
    fn test_serial_1900(serial: f64, expected: &str) {
        assert_eq!(serial_to_iso(serial, false), expected);
    }

    #[test]
    fn test_serial_1904_offset() {
        // 1904 system serial 0 is Jan 1, 1904
        assert_eq!(serial_to_iso(0.0, true), "1904-01-01");
        assert_eq!(serial_to_iso(366.0, true), "1905-01-01");
    }

    #[test]
    fn test_time_fraction() {
        assert_eq!(serial_to_iso(45292.5, false), "2024-01-01T12:00:00");
        assert_eq!(serial_to_iso(45292.25, false), "2024-01-01T06:00:00");
    }

    #[test]
    fn test_fraction_at_midnight_carries_into_next_day() {
        // 0.999999 of a day rounds to a full 86400 seconds
        assert_eq!(serial_to_iso(45292.999_999, false), "2024-01-02T00:00:00");
    }

    #[test]
    fn test_out_of_range_serials_render_empty() {
        assert_eq!(serial_to_iso(1e18, false), "");
        assert_eq!(serial_to_iso(-1.0, false), "");
        assert_eq!(serial_to_iso(f64::MAX, true), "");
    }

    #[test]
    fn test_supported_range() {
        assert!(in_supported_range(0.0));
        assert!(in_supported_range(45292.5));
        assert!(in_supported_range(2_958_465.99));
        assert!(!in_supported_range(-0.5));
        assert!(!in_supported_range(2_958_466.0));
        assert!(!in_supported_range(1e18));
        assert!(!in_supported_range(f64::NAN));
    }

    #[test]
    fn test_builtin_format_ids() {
        assert!(is_builtin_date_format(14));
        assert!(is_builtin_date_format(22));
        assert!(is_builtin_date_format(47));
        assert!(!is_builtin_date_format(0));
        assert!(!is_builtin_date_format(2));
        assert!(!is_builtin_date_format(44));
    }

    #[test_case("yyyy-mm-dd", true)]
    #[test_case("h:mm AM/PM", true)]
    #[test_case("0.00", false)]
    #[test_case("#,##0", false)]
    #[test_case("\"year\" 0.0", false; "quoted literal does not count")]
    #[test_case("[Red]0.00", false; "bracket content does not count")]
    #[test_case("[h]:mm:ss", true; "tokens outside brackets count")]
    fn test_date_format_codes(code: &str, expected: bool) {
        assert_eq!(is_date_format_code(code), expected);
    }
}
