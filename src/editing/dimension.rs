// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Dimension text grammar.
//!
//! Two mutually exclusive input forms, parsed case-insensitively when the
//! user commits the text box:
//!
//! - Compound direction: one or more `[RLUD]<number>` tokens joined by `+`
//!   (`R10+U5`), each adding a signed feet displacement along the map's local
//!   right/left/up/down axes.
//! - Length/angle: `<number>` or `<number>/<number>`: length in feet, angle
//!   in degrees from the map's local east axis (default 0).
//!
//! Unparsable or non-positive input yields `None`; callers ignore it silently
//! with no mutation and no history entry.

use crate::surface::rotate_vec;
use crate::units::feet_to_meters;
use kurbo::Vec2;

/// A successfully parsed dimension entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionInput {
    /// Summed `[RLUD]<number>` displacement, feet, before map rotation
    Compound(Vec2),
    /// `<length>[/<angle>]` in feet and degrees
    LengthAngle {
        length_feet: f64,
        angle_degrees: f64,
    },
}

impl DimensionInput {
    /// The displacement this entry produces, in meters, rotated into map
    /// coordinates by the surface's current `rotation` (radians).
    pub fn displacement_meters(&self, rotation: f64) -> Vec2 {
        let feet = match *self {
            DimensionInput::Compound(v) => v,
            DimensionInput::LengthAngle {
                length_feet,
                angle_degrees,
            } => {
                let radians = angle_degrees.to_radians();
                Vec2::new(length_feet * radians.cos(), length_feet * radians.sin())
            }
        };
        let meters = Vec2::new(feet_to_meters(feet.x), feet_to_meters(feet.y));
        rotate_vec(meters, rotation)
    }
}

/// Parse committed dimension text. Returns `None` for anything that is not
/// exactly one of the two grammar forms with positive magnitudes.
pub fn parse(text: &str) -> Option<DimensionInput> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text
        .chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_uppercase(), 'R' | 'L' | 'U' | 'D'))
    {
        parse_compound(text)
    } else {
        parse_length_angle(text)
    }
}

fn parse_compound(text: &str) -> Option<DimensionInput> {
    let mut total = Vec2::ZERO;
    for token in text.split('+') {
        let token = token.trim();
        let mut chars = token.chars();
        let axis = chars.next()?.to_ascii_uppercase();
        let feet: f64 = chars.as_str().trim().parse().ok()?;
        if !(feet > 0.0) || !feet.is_finite() {
            return None;
        }
        total += match axis {
            'R' => Vec2::new(feet, 0.0),
            'L' => Vec2::new(-feet, 0.0),
            'U' => Vec2::new(0.0, feet),
            'D' => Vec2::new(0.0, -feet),
            _ => return None,
        };
    }
    Some(DimensionInput::Compound(total))
}

fn parse_length_angle(text: &str) -> Option<DimensionInput> {
    let (length_text, angle_text) = match text.split_once('/') {
        Some((l, a)) => (l.trim(), Some(a.trim())),
        None => (text, None),
    };
    let length_feet: f64 = length_text.parse().ok()?;
    if !(length_feet > 0.0) || !length_feet.is_finite() {
        return None;
    }
    let angle_degrees = match angle_text {
        Some(a) => {
            let angle: f64 = a.parse().ok()?;
            if !angle.is_finite() {
                return None;
            }
            angle
        }
        None => 0.0,
    };
    Some(DimensionInput::LengthAngle {
        length_feet,
        angle_degrees,
    })
}
