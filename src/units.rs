// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Unit conversion and measurement formatting.
//!
//! Map coordinates are meters; user-facing dimensions are feet (switching to
//! miles past one mile). The two conversion constants are kept exactly as the
//! survey data they match: input uses 0.3048 m/ft, display uses 3.28084 ft/m.
//! They are deliberately not derived from one another.

/// Meters per foot, used when converting user input to map units
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Feet per meter, used when displaying map distances
pub const FEET_PER_METER: f64 = 3.28084;

/// Feet per mile
pub const FEET_PER_MILE: f64 = 5280.0;

/// Convert feet (user input) to meters (map units)
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

/// Convert meters (map units) to feet for display
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Format a length given in meters as feet, or miles once past a mile.
///
/// Feet are written with a trailing prime (`123.45'`), miles as `1.23 mi`.
pub fn format_length(meters: f64) -> String {
    let feet = meters_to_feet(meters);
    if feet > FEET_PER_MILE {
        format!("{:.2} mi", feet / FEET_PER_MILE)
    } else {
        format!("{feet:.2}'")
    }
}

/// Format an interior angle in degrees
pub fn format_angle(degrees: f64) -> String {
    format!("{degrees:.1}°")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_feet_below_a_mile() {
        // 30.48 m is exactly 100 ft by the display constant... almost:
        // 30.48 * 3.28084 = 100.0000032
        assert_eq!(format_length(30.48), "100.00'");
    }

    #[test]
    fn switches_to_miles_past_5280_feet() {
        let two_miles_m = 2.0 * FEET_PER_MILE / FEET_PER_METER;
        assert_eq!(format_length(two_miles_m), "2.00 mi");
    }

    #[test]
    fn exactly_one_mile_stays_in_feet() {
        let one_mile_m = FEET_PER_MILE / FEET_PER_METER;
        assert_eq!(format_length(one_mile_m), "5280.00'");
    }

    #[test]
    fn angle_formatting() {
        assert_eq!(format_angle(93.4567), "93.5°");
    }
}
