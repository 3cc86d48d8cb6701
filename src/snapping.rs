// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Snapping resolver: vertex snap and rigid edge snap.
//!
//! Two independent policies:
//!
//! - **Vertex snap** (draw/hover): scans every vertex of every feature and
//!   returns the globally nearest one within tolerance, measured in screen
//!   pixels.
//! - **Edge snap** (rigid move): projects each vertex of the moving feature
//!   onto every other feature's edges and accepts the *first* edge within
//!   tolerance in iteration order, not the nearest. The whole feature is
//!   then translated rigidly by that single offset, keeping its shape.

use crate::model::{Feature, FeatureStore};
use crate::surface::MapSurface;
use kurbo::{Point, Vec2};

/// Find the globally nearest feature vertex within `tolerance` screen pixels
/// of `pointer_pixel`. Ties break toward the strictly smaller distance; the
/// scan covers every vertex of every feature in the store.
pub fn vertex_snap(
    map: &dyn MapSurface,
    store: &dyn FeatureStore,
    pointer_pixel: Point,
    tolerance: f64,
) -> Option<Point> {
    let mut closest: Option<Point> = None;
    let mut min_dist = f64::INFINITY;

    for feature in store.all() {
        for &coord in &feature.coords {
            let pixel = map.project_to_pixel(coord);
            let dist = (pointer_pixel - pixel).hypot();
            if dist < min_dist && dist < tolerance {
                min_dist = dist;
                closest = Some(coord);
            }
        }
    }

    if let Some(coord) = closest {
        tracing::debug!(?coord, dist = min_dist, "vertex snap");
    }
    closest
}

/// Compute the rigid-move snap offset for `moving`, or `None` when no edge of
/// any other feature is within `tolerance` pixels of any of its vertices.
///
/// First-match semantics: vertices are visited in coordinate order, other
/// features in store order, edges in coordinate order, and the first
/// in-tolerance projection wins even if a closer one exists later.
pub fn edge_snap_offset(
    map: &dyn MapSurface,
    moving: &Feature,
    store: &dyn FeatureStore,
    tolerance: f64,
) -> Option<Vec2> {
    for &vertex in &moving.coords {
        let vertex_pixel = map.project_to_pixel(vertex);

        for other in store.all().iter().filter(|f| f.id != moving.id) {
            for edge in other.coords.windows(2) {
                let snapped = project_onto_segment(vertex, edge[0], edge[1]);
                let snapped_pixel = map.project_to_pixel(snapped);
                let dist = (vertex_pixel - snapped_pixel).hypot();
                if dist < tolerance {
                    let offset = snapped - vertex;
                    tracing::debug!(?offset, dist, "edge snap");
                    return Some(offset);
                }
            }
        }
    }
    None
}

/// Project `pt` orthogonally onto the segment `a..b`, clamped to the
/// endpoints. A zero-length segment projects to `a`.
pub fn project_onto_segment(pt: Point, a: Point, b: Point) -> Point {
    let d = b - a;
    let len_sq = d.hypot2();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((pt - a).dot(d) / len_sq).clamp(0.0, 1.0);
    a + d * t
}

/// Distance from `p` to the segment `a..b`
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    (p - project_onto_segment(p, a, b)).hypot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureId, MemoryStore};
    use crate::surface::PlanarSurface;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn line(points: Vec<Point>) -> Feature {
        Feature::line_string(FeatureId::next(), points)
    }

    #[test]
    fn vertex_snap_returns_global_nearest() {
        let map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        // Vertices at pixel distances 3, 9 and 40 from the pointer at origin
        store.add(line(vec![pt(40.0, 0.0), pt(9.0, 0.0)]));
        store.add(line(vec![pt(3.0, 0.0), pt(100.0, 100.0)]));

        let snapped = vertex_snap(&map, &store, pt(0.0, 0.0), 25.0);
        assert_eq!(snapped, Some(pt(3.0, 0.0)));
    }

    #[test]
    fn vertex_snap_rejects_out_of_tolerance() {
        let map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        store.add(line(vec![pt(40.0, 0.0), pt(50.0, 0.0)]));
        assert_eq!(vertex_snap(&map, &store, pt(0.0, 0.0), 25.0), None);
    }

    #[test]
    fn edge_snap_takes_first_match_not_nearest() {
        let map = PlanarSurface::new();
        let mut store = MemoryStore::new();

        // Two horizontal edges below the moving vertex at (0, 0):
        // the first candidate in store order is 8 px away, the second 2 px.
        store.add(line(vec![pt(-10.0, -8.0), pt(10.0, -8.0)]));
        store.add(line(vec![pt(-10.0, -2.0), pt(10.0, -2.0)]));
        let moving = line(vec![pt(0.0, 0.0), pt(5.0, 0.0)]);

        let offset = edge_snap_offset(&map, &moving, &store, 10.0).unwrap();
        // First-match: snaps to the farther edge because it is scanned first
        assert!((offset.y - (-8.0)).abs() < 1e-9);
        assert!(offset.x.abs() < 1e-9);
    }

    #[test]
    fn edge_snap_ignores_the_moving_feature_itself() {
        let map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let moving = line(vec![pt(0.0, 0.0), pt(10.0, 0.0)]);
        store.add(moving.clone());

        assert_eq!(edge_snap_offset(&map, &moving, &store, 10.0), None);
    }

    #[test]
    fn edge_snap_none_when_out_of_tolerance() {
        let map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        store.add(line(vec![pt(-10.0, -50.0), pt(10.0, -50.0)]));
        let moving = line(vec![pt(0.0, 0.0), pt(5.0, 0.0)]);
        assert_eq!(edge_snap_offset(&map, &moving, &store, 10.0), None);
    }

    #[test]
    fn projection_clamps_to_endpoints() {
        let a = pt(0.0, 0.0);
        let b = pt(10.0, 0.0);
        assert_eq!(project_onto_segment(pt(-5.0, 3.0), a, b), a);
        assert_eq!(project_onto_segment(pt(15.0, 3.0), a, b), b);
        assert_eq!(project_onto_segment(pt(4.0, 3.0), a, b), pt(4.0, 0.0));
        // Degenerate segment projects to its start
        assert_eq!(project_onto_segment(pt(4.0, 3.0), a, a), a);
    }

    #[test]
    fn segment_distance() {
        let d = point_to_segment_distance(pt(5.0, 7.0), pt(0.0, 0.0), pt(10.0, 0.0));
        assert!((d - 7.0).abs() < 1e-12);
    }
}
