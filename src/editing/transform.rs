// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Whole-feature transforms: mirror flips, clone, rigid translation and
//! outright deletion.

use crate::history::Action;
use crate::model::{Feature, FeatureId, FeatureStore};
use crate::overlay;
use crate::surface::MapSurface;
use kurbo::{Point, Rect, Vec2};

/// Axis a flip mirrors across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror left/right about the bounding box's vertical midline
    Horizontal,
    /// Mirror up/down about the bounding box's horizontal midline
    Vertical,
}

/// Bounding box of a coordinate sequence. Empty input gives a zero rect.
pub fn bounding_box(coords: &[Point]) -> Rect {
    let mut iter = coords.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |r, p| {
        r.union_pt(*p)
    })
}

/// Mirror `feature` about its own bounding-box midline.
///
/// Mirroring maps the ring onto itself, so closure is preserved without
/// re-closing. Returns the recorded history entry.
pub fn flip(feature: &mut Feature, map: &mut dyn MapSurface, axis: FlipAxis) -> Action {
    let bbox = bounding_box(&feature.coords);
    let center = bbox.center();
    let prev = feature.coords.clone();

    for p in &mut feature.coords {
        match axis {
            FlipAxis::Horizontal => p.x = 2.0 * center.x - p.x,
            FlipAxis::Vertical => p.y = 2.0 * center.y - p.y,
        }
    }
    overlay::recompute_labels(feature, map);

    tracing::debug!(feature = %feature.id, ?axis, "flip");
    let new = feature.coords.clone();
    match axis {
        FlipAxis::Horizontal => Action::FlipHorizontal {
            feature_id: feature.id,
            prev,
            new,
        },
        FlipAxis::Vertical => Action::FlipVertical {
            feature_id: feature.id,
            prev,
            new,
        },
    }
}

/// Duplicate a feature, translated right by its own bounding width, under a
/// fresh id. Returns `None` when the source is gone.
pub fn clone_feature(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    source_id: FeatureId,
) -> Option<Action> {
    let source = store.find_by_id(source_id)?;
    let width = bounding_box(&source.coords).width();
    let offset = Vec2::new(width, 0.0);

    let mut clone = Feature {
        id: FeatureId::next(),
        kind: source.kind,
        coords: source.coords.iter().map(|p| *p + offset).collect(),
        no_measurements: source.no_measurements,
        labels: Vec::new(),
    };
    overlay::recompute_labels(&mut clone, map);

    tracing::debug!(source = %source_id, clone = %clone.id, "clone feature");
    let action = Action::CloneFeature {
        feature_id: clone.id,
        kind: clone.kind,
        new: clone.coords.clone(),
    };
    store.add(clone);
    Some(action)
}

/// Remove a feature outright, releasing its labels first. The recorded
/// snapshot lets undo reconstruct it exactly.
pub fn delete_feature(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    id: FeatureId,
) -> Option<Action> {
    let mut feature = store.remove(id)?;
    let snapshot = feature.snapshot();
    overlay::clear_labels(&mut feature, map);

    tracing::debug!(feature = %id, "delete feature");
    Some(Action::DeleteFeature {
        feature_id: id,
        snapshot,
    })
}

/// Translate every coordinate of `feature` rigidly by `offset`
pub fn translate_feature(feature: &mut Feature, offset: Vec2) {
    for p in &mut feature.coords {
        *p += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeometryKind, MemoryStore};
    use crate::surface::PlanarSurface;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn l_shape() -> Feature {
        Feature::polygon(
            FeatureId::next(),
            vec![
                pt(0.0, 0.0),
                pt(4.0, 0.0),
                pt(4.0, 1.0),
                pt(1.0, 1.0),
                pt(1.0, 3.0),
                pt(0.0, 3.0),
            ],
        )
    }

    #[test]
    fn horizontal_flip_mirrors_about_the_bbox_midline() {
        let mut map = PlanarSurface::new();
        let mut feature = l_shape();

        flip(&mut feature, &mut map, FlipAxis::Horizontal);

        // bbox is x in [0, 4], midline x = 2
        assert_eq!(feature.coords[0], pt(4.0, 0.0));
        assert_eq!(feature.coords[1], pt(0.0, 0.0));
        assert_eq!(feature.coords.first(), feature.coords.last());
        // y untouched
        assert_eq!(feature.coords[4], pt(3.0, 3.0));
    }

    #[test]
    fn flips_are_involutions() {
        let mut map = PlanarSurface::new();
        let mut feature = l_shape();
        let original = feature.coords.clone();

        flip(&mut feature, &mut map, FlipAxis::Vertical);
        flip(&mut feature, &mut map, FlipAxis::Vertical);

        assert_eq!(feature.coords, original);
    }

    #[test]
    fn clone_offsets_by_bounding_width() {
        let mut map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let feature = l_shape();
        let source_id = feature.id;
        store.add(feature);

        let action = clone_feature(&mut store, &mut map, source_id).unwrap();
        let Action::CloneFeature { feature_id, kind, new } = action else {
            panic!("unexpected action");
        };

        assert_ne!(feature_id, source_id);
        assert_eq!(kind, GeometryKind::Polygon);
        // bbox width 4, so the clone starts at x = 4
        assert_eq!(new[0], pt(4.0, 0.0));
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn delete_snapshot_reconstructs_exactly() {
        let mut map = PlanarSurface::new();
        let mut store = MemoryStore::new();
        let mut feature = l_shape();
        feature.no_measurements = true;
        let id = feature.id;
        let coords = feature.coords.clone();
        store.add(feature);

        let action = delete_feature(&mut store, &mut map, id).unwrap();
        assert!(store.find_by_id(id).is_none());

        let Action::DeleteFeature { snapshot, .. } = action else {
            panic!("unexpected action");
        };
        let restored = snapshot.restore();
        assert_eq!(restored.id, id);
        assert_eq!(restored.coords, coords);
        assert!(restored.no_measurements);
    }

    #[test]
    fn translate_is_rigid() {
        let mut feature = l_shape();
        let original = feature.coords.clone();
        translate_feature(&mut feature, Vec2::new(2.5, -1.0));
        for (p, q) in feature.coords.iter().zip(&original) {
            assert_eq!(*p, *q + Vec2::new(2.5, -1.0));
        }
    }
}
