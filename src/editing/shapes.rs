// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Quick-shape tools.
//!
//! Both shapes are built from a center point and a dragged edge/corner point.
//! Circles are sampled as a 64-gon and flagged `no_measurements` (64 segment
//! labels would be noise); squares are always axis-aligned, sized by the
//! larger drag component, and keep their measurements.

use crate::history::Action;
use crate::model::{Feature, FeatureId, FeatureStore};
use crate::overlay;
use crate::settings;
use crate::surface::MapSurface;
use crate::units::format_length;
use kurbo::{Point, Vec2};

/// Sample a circle as a regular polygon ring (open, without the closing
/// duplicate)
pub fn circle_ring(center: Point, radius: f64) -> Vec<Point> {
    let sides = settings::shapes::CIRCLE_SIDES;
    (0..sides)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / sides as f64;
            center + Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Corners of the axis-aligned square derived from a center and a dragged
/// corner: the half-side is `max(|Δx|, |Δy|)` regardless of drag direction.
pub fn square_ring(center: Point, corner: Point) -> Vec<Point> {
    let half = square_half_side(center, corner);
    vec![
        Point::new(center.x - half, center.y - half),
        Point::new(center.x + half, center.y - half),
        Point::new(center.x + half, center.y + half),
        Point::new(center.x - half, center.y + half),
    ]
}

/// Half-side length implied by a drag from `center` to `corner`
pub fn square_half_side(center: Point, corner: Point) -> f64 {
    let d = corner - center;
    d.x.abs().max(d.y.abs())
}

/// Text for the live side-length readout shown while dragging a square out
pub fn square_side_text(center: Point, corner: Point) -> String {
    format_length(2.0 * square_half_side(center, corner))
}

/// Commit a circle dragged from `center` out to `edge`. A zero radius is a
/// degenerate drag and commits nothing.
pub fn draw_circle(
    store: &mut dyn FeatureStore,
    center: Point,
    edge: Point,
) -> Option<Action> {
    let radius = (edge - center).hypot();
    if radius == 0.0 {
        return None;
    }

    let mut circle = Feature::polygon(FeatureId::next(), circle_ring(center, radius));
    circle.no_measurements = true;

    tracing::debug!(feature = %circle.id, radius, "draw circle");
    let action = Action::DrawCircle {
        feature_id: circle.id,
        coords: circle.coords.clone(),
    };
    store.add(circle);
    Some(action)
}

/// Commit a square dragged from `center` out to `corner`. A degenerate drag
/// (zero half-side) commits nothing.
pub fn draw_square(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    center: Point,
    corner: Point,
) -> Option<Action> {
    if square_half_side(center, corner) == 0.0 {
        return None;
    }

    let mut square = Feature::polygon(FeatureId::next(), square_ring(center, corner));
    overlay::recompute_labels(&mut square, map);

    tracing::debug!(feature = %square.id, "draw square");
    let action = Action::DrawSquare {
        feature_id: square.id,
        coords: square.coords.clone(),
    };
    store.add(square);
    Some(action)
}
