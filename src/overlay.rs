// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Measurement overlay labels: segment lengths and vertex angles.
//!
//! Every geometry mutation recomputes a feature's labels as one batch: clear
//! everything, then regenerate from the current coordinates. A feature's
//! label set is therefore always either empty or an exact function of its
//! coordinate sequence, and labels are detached from the map surface before
//! their feature is removed from the store.

use crate::model::{Feature, GeometryKind};
use crate::settings;
use crate::surface::MapSurface;
use crate::units;
use kurbo::{Point, Vec2};
use std::sync::atomic::{AtomicU64, Ordering};

// ===== Label =====

/// A unique identifier for an overlay label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(u64);

static LABEL_COUNTER: AtomicU64 = AtomicU64::new(1);

impl LabelId {
    /// Create a new unique label ID
    pub fn next() -> Self {
        Self(LABEL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a label annotates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Length of one segment
    Length,
    /// Interior angle at one vertex
    Angle,
}

/// One overlay label: transient rendering resource owned by a feature
#[derive(Debug, Clone)]
pub struct Label {
    /// Unique id, used by hosts tracking attached overlays
    pub id: LabelId,
    /// Pre-formatted label text
    pub text: String,
    /// Map coordinate the label is anchored at (offset already applied)
    pub anchor: Point,
    /// Label kind
    pub kind: LabelKind,
}

// ===== Lifecycle =====

/// Detach and drop all labels for a feature
pub fn clear_labels(feature: &mut Feature, map: &mut dyn MapSurface) {
    for label in feature.labels.drain(..) {
        map.detach_overlay(&label);
    }
}

/// Recompute a feature's labels from its current coordinates.
///
/// Idempotent: clears the existing batch, then regenerates one length label
/// per segment and one angle label per interior vertex. Features flagged
/// `no_measurements` end up with no labels at all.
pub fn recompute_labels(feature: &mut Feature, map: &mut dyn MapSurface) {
    clear_labels(feature, map);
    if feature.no_measurements {
        return;
    }

    let points = feature.coords.clone();
    let mut labels = Vec::new();

    segment_length_labels(&points, map, &mut labels);
    vertex_angle_labels(&points, feature.kind, map, &mut labels);

    for label in &labels {
        map.attach_overlay(label);
    }
    tracing::debug!(
        feature = %feature.id,
        count = labels.len(),
        "recomputed measurement labels"
    );
    feature.labels = labels;
}

/// One length label per consecutive coordinate pair, offset perpendicular to
/// the segment in pixel space so it reads beside the line, not on it.
fn segment_length_labels(points: &[Point], map: &dyn MapSurface, out: &mut Vec<Label>) {
    for pair in points.windows(2) {
        let (c1, c2) = (pair[0], pair[1]);
        let text = units::format_length((c2 - c1).hypot());

        let p1 = map.project_to_pixel(c1);
        let p2 = map.project_to_pixel(c2);
        let d = p2 - p1;
        let len = d.hypot();
        let perp = if len == 0.0 {
            Vec2::ZERO
        } else {
            Vec2::new(d.y / len, -d.x / len)
        };
        let mid = p1.midpoint(p2) + perp * settings::overlay::SEGMENT_OFFSET;

        out.push(Label {
            id: LabelId::next(),
            text,
            anchor: map.project_to_coordinate(mid),
            kind: LabelKind::Length,
        });
    }
}

/// One angle label per interior vertex, offset along the angle bisector.
///
/// Polygons use wraparound neighbors over the real vertices (the closing
/// duplicate is excluded); lines label only vertices strictly between the
/// endpoints. Right angles and straight angles carry no information and are
/// suppressed.
fn vertex_angle_labels(
    points: &[Point],
    kind: GeometryKind,
    map: &dyn MapSurface,
    out: &mut Vec<Label>,
) {
    let n = points.len();
    let indices: Vec<(usize, usize, usize)> = match kind {
        GeometryKind::Polygon => {
            if n < 2 {
                return;
            }
            let real = n - 1;
            (0..real)
                .map(|i| ((i + real - 1) % real, i, (i + 1) % real))
                .collect()
        }
        GeometryKind::LineString => {
            if n < 3 {
                return;
            }
            (1..n - 1).map(|i| (i - 1, i, i + 1)).collect()
        }
    };

    for (pi, ci, ni) in indices {
        let Some(angle) = vertex_angle(points[pi], points[ci], points[ni]) else {
            continue;
        };
        if (angle - 90.0).abs() < settings::overlay::ANGLE_SUPPRESS_EPSILON
            || (angle - 180.0).abs() < settings::overlay::ANGLE_SUPPRESS_EPSILON
        {
            continue;
        }

        let pc = map.project_to_pixel(points[ci]);
        let pp = map.project_to_pixel(points[pi]);
        let pn = map.project_to_pixel(points[ni]);
        let bisector = (pp - pc) + (pn - pc);
        let bis_len = bisector.hypot().max(1.0);
        let anchor_px = pc + bisector * (settings::overlay::ANGLE_OFFSET / bis_len);

        out.push(Label {
            id: LabelId::next(),
            text: units::format_angle(angle),
            anchor: map.project_to_coordinate(anchor_px),
            kind: LabelKind::Angle,
        });
    }
}

/// Interior angle at `curr` between the rays to `prev` and `next`, degrees.
///
/// `None` when either ray has zero length (angle undefined).
pub fn vertex_angle(prev: Point, curr: Point, next: Point) -> Option<f64> {
    let v1 = prev - curr;
    let v2 = next - curr;
    let (l1, l2) = (v1.hypot(), v2.hypot());
    if l1 == 0.0 || l2 == 0.0 {
        return None;
    }
    let cos = (v1.dot(v2) / (l1 * l2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}
