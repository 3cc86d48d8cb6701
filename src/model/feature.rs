// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! The feature model: coordinate rings and sequences.
//!
//! A `Feature` is one parcel on the map: either a closed polygon ring or an
//! open line string, tagged explicitly with `GeometryKind`. Coordinates are
//! `kurbo::Point` in map units (meters).
//!
//! Ring closure is handled by exactly one pair of helpers, `open_ring` and
//! `close_ring`: structural edits open the ring (drop the trailing duplicate),
//! work on real vertices, and close it again. No operation touches the
//! closing slot directly.

use crate::overlay::Label;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use super::FeatureId;

/// Geometry kind of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Closed ring: first and last coordinates coincide
    Polygon,
    /// Open sequence of two or more points
    LineString,
}

impl GeometryKind {
    /// Minimum coordinate count for a finished feature of this kind.
    ///
    /// A polygon needs 3 distinct vertices plus the closing duplicate; a line
    /// needs 2 endpoints.
    pub fn min_points(self) -> usize {
        match self {
            GeometryKind::Polygon => 4,
            GeometryKind::LineString => 2,
        }
    }
}

/// One editable parcel feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Immutable identifier; survives in-place replacement
    pub id: FeatureId,
    /// Geometry kind, dispatched by matching everywhere
    pub kind: GeometryKind,
    /// Coordinate ring (polygon, closing duplicate included) or sequence (line)
    pub coords: Vec<Point>,
    /// When set, the measurement overlay manager skips this feature
    pub no_measurements: bool,
    /// Overlay labels currently attached for this feature.
    ///
    /// Owned exclusively by this feature; always detached from the map
    /// surface before the feature leaves the store. Not part of snapshots.
    #[serde(skip)]
    pub labels: Vec<Label>,
}

impl Feature {
    /// Create a polygon feature. The ring is closed if it is not already.
    pub fn polygon(id: FeatureId, mut coords: Vec<Point>) -> Self {
        close_ring(&mut coords);
        Feature {
            id,
            kind: GeometryKind::Polygon,
            coords,
            no_measurements: false,
            labels: Vec::new(),
        }
    }

    /// Create a line string feature
    pub fn line_string(id: FeatureId, coords: Vec<Point>) -> Self {
        Feature {
            id,
            kind: GeometryKind::LineString,
            coords,
            no_measurements: false,
            labels: Vec::new(),
        }
    }

    /// Whether this feature is a closed ring
    pub fn is_polygon(&self) -> bool {
        self.kind == GeometryKind::Polygon
    }

    /// Number of segments (consecutive coordinate pairs)
    pub fn segment_count(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// The last real vertex. For a polygon this skips the closing duplicate.
    ///
    /// Dimension input, nudges and curves extend the shape from this point.
    pub fn last_real_vertex(&self) -> Option<Point> {
        match self.kind {
            GeometryKind::Polygon => {
                if self.coords.len() == 1 {
                    self.coords.first().copied()
                } else {
                    self.coords.get(self.coords.len().wrapping_sub(2)).copied()
                }
            }
            GeometryKind::LineString => self.coords.last().copied(),
        }
    }

    /// Whether the current coordinates satisfy the kind's invariants
    pub fn is_valid(&self) -> bool {
        ring_is_valid(&self.coords, self.kind)
    }

    /// Capture a history snapshot: everything but the overlay labels
    pub fn snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot {
            id: self.id,
            kind: self.kind,
            coords: self.coords.clone(),
            no_measurements: self.no_measurements,
        }
    }
}

/// Deep-copied feature state recorded for delete-undo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// The deleted feature's id, reused on restore
    pub id: FeatureId,
    /// Geometry kind at deletion time
    pub kind: GeometryKind,
    /// Full coordinate ring/sequence at deletion time
    pub coords: Vec<Point>,
    /// Measurement suppression flag at deletion time
    pub no_measurements: bool,
}

impl FeatureSnapshot {
    /// Reconstruct the feature exactly as it was (labels start empty and are
    /// recomputed by the caller).
    pub fn restore(&self) -> Feature {
        Feature {
            id: self.id,
            kind: self.kind,
            coords: self.coords.clone(),
            no_measurements: self.no_measurements,
            labels: Vec::new(),
        }
    }
}

/// Validate a coordinate ring/sequence for a kind.
///
/// False when below the kind's minimum point count or when any two
/// consecutive points are coordinate-equal. Callers check this before
/// committing a structural edit; on failure the edit is discarded whole.
pub fn ring_is_valid(coords: &[Point], kind: GeometryKind) -> bool {
    if coords.len() < kind.min_points() {
        return false;
    }
    !coords.windows(2).any(|w| w[0] == w[1])
}

/// Drop the trailing closing duplicate in place, leaving only real vertices.
pub fn open_ring(coords: &mut Vec<Point>) {
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
}

/// Close a ring in place by re-appending the first point.
///
/// A single point becomes the degenerate two-point ring used while a drawing
/// gesture is in progress; a ring that already ends on its first point is
/// left untouched.
pub fn close_ring(coords: &mut Vec<Point>) {
    match coords.as_slice() {
        [] => {}
        [only] => {
            let p = *only;
            coords.push(p);
        }
        [first, .., last] => {
            if first != last {
                let p = *first;
                coords.push(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn close_ring_appends_first_point() {
        let mut ring = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)];
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn close_ring_is_idempotent() {
        let mut ring = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)];
        close_ring(&mut ring);
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn close_ring_of_single_point_duplicates_it() {
        let mut ring = vec![pt(3.0, 4.0)];
        close_ring(&mut ring);
        assert_eq!(ring, vec![pt(3.0, 4.0), pt(3.0, 4.0)]);
    }

    #[test]
    fn open_then_close_round_trips() {
        let ring = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 0.0)];
        let mut opened = ring.clone();
        open_ring(&mut opened);
        assert_eq!(opened.len(), 3);
        close_ring(&mut opened);
        assert_eq!(opened, ring);
    }

    #[test]
    fn polygon_needs_four_points() {
        let tri = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 0.0)];
        assert!(ring_is_valid(&tri, GeometryKind::Polygon));
        assert!(!ring_is_valid(&tri[..3], GeometryKind::Polygon));
    }

    #[test]
    fn consecutive_duplicates_are_invalid() {
        let ring = vec![
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(0.0, 0.0),
        ];
        assert!(!ring_is_valid(&ring, GeometryKind::Polygon));
        let line = vec![pt(0.0, 0.0), pt(0.0, 0.0)];
        assert!(!ring_is_valid(&line, GeometryKind::LineString));
    }

    #[test]
    fn last_real_vertex_skips_closing_duplicate() {
        let poly = Feature::polygon(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)],
        );
        assert_eq!(poly.last_real_vertex(), Some(pt(10.0, 10.0)));

        let line = Feature::line_string(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(5.0, 5.0)],
        );
        assert_eq!(line.last_real_vertex(), Some(pt(5.0, 5.0)));
    }

    #[test]
    fn snapshot_restores_exactly() {
        let mut poly = Feature::polygon(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)],
        );
        poly.no_measurements = true;
        let snap = poly.snapshot();
        let restored = snap.restore();
        assert_eq!(restored.id, poly.id);
        assert_eq!(restored.kind, poly.kind);
        assert_eq!(restored.coords, poly.coords);
        assert!(restored.no_measurements);
    }

    #[test]
    fn snapshot_survives_serde_round_trip() {
        let poly = Feature::polygon(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)],
        );
        let snap = poly.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: FeatureSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
