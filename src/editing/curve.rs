// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Curve insertion.
//!
//! A curve is specified from the last placed vertex as a straight chord
//! (`rise`/`run`, feet) plus a `bulge`, the perpendicular offset (feet) of a
//! quadratic bezier control point from the chord midpoint. The chord is
//! sampled at one point per foot of chord length, clamped to 4..=16 samples,
//! and the samples are spliced into the ring in place of the closing vertex.

use crate::error::EditError;
use crate::history::Action;
use crate::model::{close_ring, open_ring, Feature};
use crate::overlay;
use crate::settings;
use crate::surface::MapSurface;
use crate::units::feet_to_meters;
use kurbo::{ParamCurve, Point, QuadBez, Vec2};

/// Sample the quadratic bezier described by a chord from `start` and a bulge.
///
/// Returns the generated points excluding `start` and including the chord
/// endpoint. Rejects a zero-length chord, whose perpendicular is undefined.
pub fn sample_curve(
    start: Point,
    rise_feet: f64,
    run_feet: f64,
    bulge_feet: f64,
) -> Result<Vec<Point>, EditError> {
    let chord_feet = (rise_feet * rise_feet + run_feet * run_feet).sqrt();
    if chord_feet == 0.0 {
        return Err(EditError::ZeroLengthChord);
    }

    let delta = Vec2::new(feet_to_meters(run_feet), feet_to_meters(rise_feet));
    let end = start + delta;
    let midpoint = start.midpoint(end);
    // Unit left-perpendicular of the chord; positive bulge curves left
    let perp = Vec2::new(-delta.y, delta.x) / delta.hypot();
    let control = midpoint + perp * feet_to_meters(bulge_feet);

    let samples = (chord_feet.round() as usize)
        .clamp(settings::curve::MIN_SAMPLES, settings::curve::MAX_SAMPLES);
    let bez = QuadBez::new(start, control, end);
    Ok((1..=samples)
        .map(|i| bez.eval(i as f64 / samples as f64))
        .collect())
}

/// Append a sampled curve to `feature` starting at its last placed vertex.
///
/// The ring is re-closed unconditionally afterward and the feature's labels
/// are recomputed. Returns the recorded history entry.
pub fn add_curve(
    feature: &mut Feature,
    map: &mut dyn MapSurface,
    rise_feet: f64,
    run_feet: f64,
    bulge_feet: f64,
) -> Result<Action, EditError> {
    let start = feature
        .last_real_vertex()
        .ok_or(EditError::ZeroLengthChord)?;
    let samples = sample_curve(start, rise_feet, run_feet, bulge_feet)?;

    let prev = feature.coords.clone();
    if feature.is_polygon() {
        open_ring(&mut feature.coords);
        feature.coords.extend(samples);
        close_ring(&mut feature.coords);
    } else {
        feature.coords.extend(samples);
    }
    overlay::recompute_labels(feature, map);

    tracing::debug!(feature = %feature.id, rise_feet, run_feet, bulge_feet, "add curve");
    Ok(Action::AddCurve {
        feature_id: feature.id,
        prev,
        new: feature.coords.clone(),
        rise: rise_feet,
        run: run_feet,
        bulge: bulge_feet,
    })
}
