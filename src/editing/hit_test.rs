// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Pixel-tolerance hit testing for hover highlighting and context-menu
//! targeting. Vertices are scanned before edges so a click near a corner
//! resolves to the vertex, not one of its two edges.

use crate::model::{FeatureId, FeatureStore};
use crate::settings;
use crate::snapping::point_to_segment_distance;
use crate::surface::MapSurface;
use kurbo::Point;

/// What a hit test resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// A vertex; `index` is the coordinate index
    Vertex,
    /// An edge; `index` is the segment index (edge from `index` to `index + 1`)
    Edge,
}

/// A resolved hit target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub feature_id: FeatureId,
    pub index: usize,
    pub kind: HitKind,
}

/// Resolve `pointer_pixel` against every feature's vertices, then edges.
/// First hit within `settings::hit_test::TOLERANCE` pixels wins.
pub fn hit_test(
    map: &dyn MapSurface,
    store: &dyn FeatureStore,
    pointer_pixel: Point,
) -> Option<Hit> {
    let tolerance = settings::hit_test::TOLERANCE;

    for feature in store.all() {
        for (index, &coord) in feature.coords.iter().enumerate() {
            let dist = (pointer_pixel - map.project_to_pixel(coord)).hypot();
            if dist < tolerance {
                return Some(Hit {
                    feature_id: feature.id,
                    index: vertex_index(feature.coords.len(), index, feature.is_polygon()),
                    kind: HitKind::Vertex,
                });
            }
        }
    }

    for feature in store.all() {
        for (index, edge) in feature.coords.windows(2).enumerate() {
            let a = map.project_to_pixel(edge[0]);
            let b = map.project_to_pixel(edge[1]);
            if point_to_segment_distance(pointer_pixel, a, b) < tolerance {
                return Some(Hit {
                    feature_id: feature.id,
                    index,
                    kind: HitKind::Edge,
                });
            }
        }
    }

    None
}

/// A polygon's closing duplicate resolves to vertex 0
fn vertex_index(len: usize, index: usize, is_polygon: bool) -> usize {
    if is_polygon && len > 1 && index == len - 1 {
        0
    } else {
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feature, MemoryStore};
    use crate::surface::PlanarSurface;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn store_with_square() -> (MemoryStore, FeatureId) {
        let mut store = MemoryStore::new();
        let id = FeatureId::next();
        store.add(Feature::polygon(
            id,
            vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0), pt(0.0, 100.0)],
        ));
        (store, id)
    }

    #[test]
    fn vertex_wins_over_its_edges() {
        let (store, id) = store_with_square();
        let map = PlanarSurface::new();

        // 5 px from the corner, also within 8 px of two edges
        let hit = hit_test(&map, &store, pt(5.0, 0.0)).unwrap();
        assert_eq!(hit.feature_id, id);
        assert_eq!(hit.kind, HitKind::Vertex);
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn edge_hit_reports_segment_index() {
        let (store, id) = store_with_square();
        let map = PlanarSurface::new();

        let hit = hit_test(&map, &store, pt(50.0, 3.0)).unwrap();
        assert_eq!(hit.feature_id, id);
        assert_eq!(hit.kind, HitKind::Edge);
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn closing_duplicate_resolves_to_vertex_zero() {
        let (store, _) = store_with_square();
        let map = PlanarSurface::new();

        // Exactly on the shared first/last coordinate
        let hit = hit_test(&map, &store, pt(0.0, 0.0)).unwrap();
        assert_eq!(hit.kind, HitKind::Vertex);
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn misses_outside_tolerance() {
        let (store, _) = store_with_square();
        let map = PlanarSurface::new();
        assert!(hit_test(&map, &store, pt(50.0, 50.0)).is_none());
        assert!(hit_test(&map, &store, pt(200.0, 200.0)).is_none());
    }
}
