// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Structural segment and vertex edits.
//!
//! Every operation here validates the full candidate geometry before touching
//! the feature, so a rejected edit leaves the coordinates untouched and
//! records nothing.

use crate::error::EditError;
use crate::history::Action;
use crate::model::{
    close_ring, open_ring, ring_is_valid, Feature, FeatureId, FeatureStore, GeometryKind,
};
use crate::overlay;
use crate::surface::MapSurface;
use crate::units::FEET_PER_METER;

/// Resize one segment to an exact length in feet.
///
/// The segment's other endpoint stays fixed. The ring's closing segment is
/// the exception: its true endpoint is the closing duplicate of the first
/// vertex, which must never move independently, so the **last real vertex**
/// moves instead, holding the first vertex fixed.
pub fn set_segment_length(
    feature: &mut Feature,
    map: &mut dyn MapSurface,
    index: usize,
    new_length_feet: f64,
) -> Result<Action, EditError> {
    let segments = feature.segment_count();
    if index >= segments {
        return Err(EditError::SegmentOutOfRange(index));
    }
    if !new_length_feet.is_finite() || new_length_feet <= 0.0 {
        return Err(EditError::InvalidGeometry(feature.kind));
    }
    let new_length = new_length_feet / FEET_PER_METER;

    let mut candidate = feature.coords.clone();
    let closing = feature.is_polygon() && index == segments - 1;
    if closing {
        let first = candidate[0];
        let last_real = candidate[index];
        let chord = last_real - first;
        let length = chord.hypot();
        if length == 0.0 {
            return Err(EditError::ZeroLengthSegment);
        }
        candidate[index] = first + chord * (new_length / length);
    } else {
        let a = candidate[index];
        let b = candidate[index + 1];
        let chord = b - a;
        let length = chord.hypot();
        if length == 0.0 {
            return Err(EditError::ZeroLengthSegment);
        }
        candidate[index + 1] = a + chord * (new_length / length);
    }

    if !ring_is_valid(&candidate, feature.kind) {
        return Err(EditError::InvalidGeometry(feature.kind));
    }

    let prev = std::mem::replace(&mut feature.coords, candidate);
    overlay::recompute_labels(feature, map);
    tracing::debug!(feature = %feature.id, index, new_length_feet, "segment resized");
    Ok(Action::EditSegmentLength {
        feature_id: feature.id,
        prev,
        new: feature.coords.clone(),
        index,
        new_length_feet,
    })
}

/// Remove one vertex. Polygons re-close the ring afterward; a request for
/// the closing duplicate resolves to vertex 0.
pub fn delete_vertex(
    feature: &mut Feature,
    map: &mut dyn MapSurface,
    index: usize,
) -> Result<Action, EditError> {
    let candidate = match feature.kind {
        GeometryKind::Polygon => {
            let mut reals = feature.coords.clone();
            open_ring(&mut reals);
            let index = if index == feature.coords.len() - 1 { 0 } else { index };
            if index >= reals.len() {
                return Err(EditError::VertexOutOfRange(index));
            }
            if feature.coords.len() - 1 < feature.kind.min_points() {
                return Err(EditError::BelowMinimumVertices {
                    kind: feature.kind,
                    min: feature.kind.min_points(),
                });
            }
            reals.remove(index);
            close_ring(&mut reals);
            reals
        }
        GeometryKind::LineString => {
            if index >= feature.coords.len() {
                return Err(EditError::VertexOutOfRange(index));
            }
            if feature.coords.len() - 1 < feature.kind.min_points() {
                return Err(EditError::BelowMinimumVertices {
                    kind: feature.kind,
                    min: feature.kind.min_points(),
                });
            }
            let mut candidate = feature.coords.clone();
            candidate.remove(index);
            candidate
        }
    };

    if !ring_is_valid(&candidate, feature.kind) {
        return Err(EditError::InvalidGeometry(feature.kind));
    }

    let prev = std::mem::replace(&mut feature.coords, candidate);
    overlay::recompute_labels(feature, map);
    tracing::debug!(feature = %feature.id, index, "vertex deleted");
    Ok(Action::DeleteVertex {
        feature_id: feature.id,
        prev,
        new: feature.coords.clone(),
        index,
    })
}

/// Cut one segment out of a feature.
///
/// Cutting a polygon edge opens the ring into a line: the ring is rotated so
/// the cut lands at the ends, the closing duplicate is dropped, and the
/// feature is replaced by a `LineString` carrying the same id. Cutting an
/// internal line segment removes the endpoint that follows the cut.
pub fn delete_segment(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    id: FeatureId,
    index: usize,
) -> Result<Action, EditError> {
    // an id that is no longer in the store has no segments at all
    let Some(feature) = store.find_by_id(id) else {
        return Err(EditError::SegmentOutOfRange(index));
    };
    if index >= feature.segment_count() {
        return Err(EditError::SegmentOutOfRange(index));
    }

    match feature.kind {
        GeometryKind::Polygon => {
            let prev = feature.coords.clone();
            let mut line_coords = prev.clone();
            open_ring(&mut line_coords);
            // Rotate so the cut edge's far vertex leads and its near vertex
            // trails; the cut edge itself is the one no longer spanned.
            let shift = (index + 1) % line_coords.len();
            line_coords.rotate_left(shift);

            let mut removed = match store.remove(id) {
                Some(f) => f,
                None => return Err(EditError::SegmentOutOfRange(index)),
            };
            overlay::clear_labels(&mut removed, map);
            let mut line = Feature::line_string(id, line_coords.clone());
            line.no_measurements = removed.no_measurements;
            overlay::recompute_labels(&mut line, map);
            store.add(line);

            tracing::debug!(feature = %id, index, "polygon segment cut, converted to line");
            Ok(Action::DeleteSegment {
                feature_id: id,
                prev_kind: GeometryKind::Polygon,
                prev,
                new: line_coords,
                index,
            })
        }
        GeometryKind::LineString => {
            if feature.coords.len() < 3 {
                return Err(EditError::BelowMinimumVertices {
                    kind: GeometryKind::LineString,
                    min: GeometryKind::LineString.min_points(),
                });
            }
            let mut candidate = feature.coords.clone();
            let prev = feature.coords.clone();
            candidate.remove(index + 1);
            if !ring_is_valid(&candidate, GeometryKind::LineString) {
                return Err(EditError::InvalidGeometry(GeometryKind::LineString));
            }

            let feature = match store.find_by_id_mut(id) {
                Some(f) => f,
                None => return Err(EditError::SegmentOutOfRange(index)),
            };
            feature.coords = candidate;
            overlay::recompute_labels(feature, map);
            let new = feature.coords.clone();

            tracing::debug!(feature = %id, index, "line segment deleted");
            Ok(Action::DeleteSegment {
                feature_id: id,
                prev_kind: GeometryKind::LineString,
                prev,
                new,
                index,
            })
        }
    }
}

/// Consume an open line into a new in-progress polygon with the same id.
///
/// `reverse` flips the point order first, so the clicked endpoint leads.
/// The returned action lets undo restore the original line exactly.
pub fn consume_line_into_polygon(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    id: FeatureId,
    reverse: bool,
) -> Option<Action> {
    let mut line = store.remove(id)?;
    overlay::clear_labels(&mut line, map);
    let prev = line.coords.clone();

    let mut points = line.coords;
    if reverse {
        points.reverse();
    }
    let mut polygon = Feature::polygon(id, points);
    overlay::recompute_labels(&mut polygon, map);
    let new = polygon.coords.clone();
    store.add(polygon);

    tracing::debug!(feature = %id, reverse, "line consumed into polygon");
    Some(Action::ConvertToPolygon {
        feature_id: id,
        prev,
        new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoryStore;
    use crate::surface::PlanarSurface;
    use crate::units::meters_to_feet;
    use kurbo::Point;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square() -> Feature {
        Feature::polygon(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)],
        )
    }

    #[test]
    fn resize_moves_the_far_endpoint_only() {
        let mut map = PlanarSurface::new();
        let mut feature = square();

        set_segment_length(&mut feature, &mut map, 0, 50.0).unwrap();

        assert_eq!(feature.coords[0], pt(0.0, 0.0));
        let length_feet = meters_to_feet((feature.coords[1] - feature.coords[0]).hypot());
        assert!((length_feet - 50.0).abs() / 50.0 < 1e-6);
        // direction preserved
        assert_eq!(feature.coords[1].y, 0.0);
    }

    #[test]
    fn resize_closing_segment_moves_the_last_real_vertex() {
        let mut map = PlanarSurface::new();
        let mut feature = square();
        let closing = feature.segment_count() - 1;

        set_segment_length(&mut feature, &mut map, closing, 25.0).unwrap();

        // first vertex and closing duplicate untouched
        assert_eq!(feature.coords[0], pt(0.0, 0.0));
        assert_eq!(feature.coords.first(), feature.coords.last());
        let last_real = feature.coords[feature.coords.len() - 2];
        let length_feet = meters_to_feet((last_real - feature.coords[0]).hypot());
        assert!((length_feet - 25.0).abs() / 25.0 < 1e-6);
        assert_eq!(last_real.x, 0.0);
    }

    #[test]
    fn resize_rejects_out_of_range_and_zero_length() {
        let mut map = PlanarSurface::new();
        let mut feature = square();
        let before = feature.coords.clone();

        assert_eq!(
            set_segment_length(&mut feature, &mut map, 99, 10.0),
            Err(EditError::SegmentOutOfRange(99))
        );

        let mut degenerate = Feature::line_string(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(5.0, 5.0)],
        );
        assert_eq!(
            set_segment_length(&mut degenerate, &mut map, 0, 10.0),
            Err(EditError::ZeroLengthSegment)
        );

        assert_eq!(feature.coords, before);
    }

    #[test]
    fn delete_vertex_recloses_the_ring() {
        let mut map = PlanarSurface::new();
        let mut feature = square();

        delete_vertex(&mut feature, &mut map, 0).unwrap();

        assert_eq!(feature.coords.len(), 4);
        assert_eq!(feature.coords.first(), feature.coords.last());
        assert_eq!(feature.coords[0], pt(10.0, 0.0));
    }

    #[test]
    fn delete_vertex_respects_the_minimum() {
        let mut map = PlanarSurface::new();
        let mut triangle = Feature::polygon(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)],
        );
        let before = triangle.coords.clone();

        let err = delete_vertex(&mut triangle, &mut map, 1).unwrap_err();
        assert!(matches!(err, EditError::BelowMinimumVertices { .. }));
        assert_eq!(triangle.coords, before);
    }

    #[test]
    fn delete_middle_vertex_of_a_line() {
        let mut map = PlanarSurface::new();
        let mut line = Feature::line_string(
            FeatureId::next(),
            vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 0.0), pt(4.0, 0.0)],
        );

        delete_vertex(&mut line, &mut map, 2).unwrap();
        assert_eq!(line.coords.len(), 4);

        let mut short = Feature::line_string(FeatureId::next(), vec![pt(0.0, 0.0), pt(1.0, 0.0)]);
        let before = short.coords.clone();
        assert!(delete_vertex(&mut short, &mut map, 0).is_err());
        assert_eq!(short.coords, before);
    }

    #[test]
    fn cutting_a_polygon_edge_opens_it_into_a_line() {
        let mut map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let feature = square();
        let id = feature.id;
        store.add(feature);

        // cut edge 1, from (10,0) to (10,10)
        let action = delete_segment(&mut store, &mut map, id, 1).unwrap();

        let line = store.find_by_id(id).unwrap();
        assert_eq!(line.kind, GeometryKind::LineString);
        assert_eq!(
            line.coords,
            vec![pt(10.0, 10.0), pt(0.0, 10.0), pt(0.0, 0.0), pt(10.0, 0.0)]
        );
        match action {
            Action::DeleteSegment { prev_kind, prev, .. } => {
                assert_eq!(prev_kind, GeometryKind::Polygon);
                assert_eq!(prev.len(), 5);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn cutting_the_closing_edge_keeps_vertex_order() {
        let mut map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let feature = square();
        let id = feature.id;
        store.add(feature);

        delete_segment(&mut store, &mut map, id, 3).unwrap();
        let line = store.find_by_id(id).unwrap();
        assert_eq!(
            line.coords,
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]
        );
    }

    #[test]
    fn line_segment_delete_removes_the_following_endpoint() {
        let mut map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let id = FeatureId::next();
        store.add(Feature::line_string(
            id,
            vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)],
        ));

        delete_segment(&mut store, &mut map, id, 0).unwrap();
        assert_eq!(
            store.find_by_id(id).unwrap().coords,
            vec![pt(0.0, 0.0), pt(2.0, 0.0)]
        );

        // a two-point line cannot lose another segment
        assert!(delete_segment(&mut store, &mut map, id, 0).is_err());
    }

    #[test]
    fn consume_line_reverses_when_asked() {
        let mut map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let id = FeatureId::next();
        let coords = vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(5.0, 5.0)];
        store.add(Feature::line_string(id, coords.clone()));

        let action = consume_line_into_polygon(&mut store, &mut map, id, true).unwrap();

        let polygon = store.find_by_id(id).unwrap();
        assert_eq!(polygon.kind, GeometryKind::Polygon);
        assert_eq!(polygon.coords[0], pt(5.0, 5.0));
        assert_eq!(polygon.coords.first(), polygon.coords.last());
        match action {
            Action::ConvertToPolygon { prev, .. } => assert_eq!(prev, coords),
            other => panic!("unexpected action {other:?}"),
        }
    }
}
