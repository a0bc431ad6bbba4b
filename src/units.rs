//! Point/pixel size conversion.
//!
//! Document font sizes are stored in points; the grid widget styles cells
//! in CSS pixels. The conversion factor is fixed at 4/3 px per pt (96 DPI
//! over 72 DPI). Both directions round to 2 decimal places, half away from
//! zero, and always re-derive from the canonical stored unit so repeated
//! round trips stabilize instead of accumulating drift.

const PX_PER_PT: f64 = 4.0 / 3.0;
const PT_PER_PX: f64 = 3.0 / 4.0;

/// Round to 2 decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a point size to pixels. Non-finite input yields `None`.
pub fn points_to_pixels(pt: f64) -> Option<f64> {
    if !pt.is_finite() {
        return None;
    }
    Some(round2(pt * PX_PER_PT))
}

/// Convert a pixel size to points. Non-finite input yields `None`.
pub fn pixels_to_points(px: f64) -> Option<f64> {
    if !px.is_finite() {
        return None;
    }
    Some(round2(px * PT_PER_PX))
}

/// Render a pixel value for a CSS declaration.
///
/// Whole values format as integers ("16px"), fractional values keep the
/// rounded decimal ("16.67px"). Non-finite values get no unit suffix.
pub fn format_pixels(px: f64) -> String {
    if !px.is_finite() {
        return px.to_string();
    }
    let rounded = round2(px);
    if rounded.fract().abs() < f64::EPSILON {
        format!("{rounded:.0}px")
    } else {
        format!("{rounded}px")
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(12.0, 16.0)]
    #[test_case(11.0, 14.67)]
    #[test_case(10.5, 14.0)]
    #[test_case(0.0, 0.0)]
    #[test_case(72.0, 96.0)]
    fn test_points_to_pixels(pt: f64, px: f64) {
        assert_eq!(points_to_pixels(pt), Some(px));
    }

    #[test_case(16.0, 12.0)]
    #[test_case(14.67, 11.0)]
    #[test_case(14.0, 10.5)]
    fn test_pixels_to_points(px: f64, pt: f64) {
        assert_eq!(pixels_to_points(px), Some(pt));
    }

    #[test]
    fn test_non_finite_is_absent() {
        assert_eq!(points_to_pixels(f64::NAN), None);
        assert_eq!(points_to_pixels(f64::INFINITY), None);
        assert_eq!(pixels_to_points(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        // 0.02px * 0.75 = 0.015pt; the half-unit rounds away from zero
        assert_eq!(pixels_to_points(0.02), Some(0.02));
        assert_eq!(pixels_to_points(-0.02), Some(-0.02));
    }

    #[test]
    fn test_round_trip_stabilizes() {
        for pt in [8.0, 9.5, 11.0, 12.0, 13.3, 24.0, 409.0] {
            let px = points_to_pixels(pt).unwrap();
            let back = pixels_to_points(px).unwrap();
            assert!((back - pt).abs() <= 0.01, "{pt} -> {px} -> {back}");

            // Two more passes must not widen the drift.
            let px2 = points_to_pixels(back).unwrap();
            let back2 = pixels_to_points(px2).unwrap();
            assert!((back2 - pt).abs() <= 0.01, "{pt} drifted to {back2}");
            assert_eq!(back2, back);
        }
    }

    #[test]
    fn test_format_pixels() {
        assert_eq!(format_pixels(16.0), "16px");
        assert_eq!(format_pixels(14.666_666), "14.67px");
        assert_eq!(format_pixels(0.0), "0px");
        assert_eq!(format_pixels(f64::NAN), "NaN");
    }
}
