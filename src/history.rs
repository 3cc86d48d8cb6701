// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Action history: the undo/redo log.
//!
//! Every committed mutation is recorded as exactly one `Action` carrying
//! deep-copied coordinate snapshots, so undo and redo are pure replays with
//! no dependence on current state. The variant set is closed: each variant
//! owns its inverse and reapply logic in the `match` below, and recording a
//! new action invalidates (clears) the redo stack.

use crate::model::{
    Feature, FeatureId, FeatureSnapshot, FeatureStore, GeometryKind,
};
use crate::overlay;
use crate::surface::MapSurface;
use kurbo::Point;
use serde::{Deserialize, Serialize};

// ===== Action =====

/// One recorded, invertible unit of history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A vertex was appended while drawing
    AddPoint {
        /// Feature the vertex was appended to
        feature_id: FeatureId,
        /// Ring before the append (empty when this click created the feature)
        prev: Vec<Point>,
        /// Ring after the append
        new: Vec<Point>,
        /// The appended vertex
        point: Point,
        /// Index of the appended vertex in the ring
        index: usize,
    },
    /// A vertex was removed via the context menu
    DeleteVertex {
        feature_id: FeatureId,
        prev: Vec<Point>,
        new: Vec<Point>,
        /// Index of the removed vertex
        index: usize,
    },
    /// A segment was cut; for polygons this converted the ring to a line
    DeleteSegment {
        feature_id: FeatureId,
        /// Geometry kind before the cut
        prev_kind: GeometryKind,
        /// Coordinates before the cut (closed ring for polygons)
        prev: Vec<Point>,
        /// Coordinates after the cut (always an open sequence for polygons)
        new: Vec<Point>,
        /// Index of the cut segment
        index: usize,
    },
    /// A whole feature was translated
    MoveFeature {
        feature_id: FeatureId,
        prev: Vec<Point>,
        new: Vec<Point>,
    },
    /// Mirrored about the vertical midline of its bounding box
    FlipHorizontal {
        feature_id: FeatureId,
        prev: Vec<Point>,
        new: Vec<Point>,
    },
    /// Mirrored about the horizontal midline of its bounding box
    FlipVertical {
        feature_id: FeatureId,
        prev: Vec<Point>,
        new: Vec<Point>,
    },
    /// One segment resized to an exact length
    EditSegmentLength {
        feature_id: FeatureId,
        prev: Vec<Point>,
        new: Vec<Point>,
        /// Index of the resized segment
        index: usize,
        /// Target length in feet
        new_length_feet: f64,
    },
    /// A curved run of sampled points replaced the final vertex
    AddCurve {
        feature_id: FeatureId,
        prev: Vec<Point>,
        new: Vec<Point>,
        /// Vertical displacement of the chord, feet
        rise: f64,
        /// Horizontal displacement of the chord, feet
        run: f64,
        /// Perpendicular offset of the control point, feet
        bulge: f64,
    },
    /// A translated copy of an existing feature was created
    CloneFeature {
        /// Id of the new clone (not the source)
        feature_id: FeatureId,
        /// The clone's geometry kind
        kind: GeometryKind,
        /// The clone's coordinates
        new: Vec<Point>,
    },
    /// An open line was consumed into a new in-progress polygon
    ConvertToPolygon {
        feature_id: FeatureId,
        /// The original line's coordinates
        prev: Vec<Point>,
        /// The polygon ring built from them
        new: Vec<Point>,
    },
    /// The circle quick-shape tool committed a feature
    DrawCircle {
        feature_id: FeatureId,
        /// The sampled circle ring
        coords: Vec<Point>,
    },
    /// The square quick-shape tool committed a feature
    DrawSquare {
        feature_id: FeatureId,
        /// The square ring
        coords: Vec<Point>,
    },
    /// A feature was deleted outright
    DeleteFeature {
        feature_id: FeatureId,
        /// Full snapshot for exact reconstruction
        snapshot: FeatureSnapshot,
    },
}

impl Action {
    /// Id of the feature this action mutated
    pub fn feature_id(&self) -> FeatureId {
        match self {
            Action::AddPoint { feature_id, .. }
            | Action::DeleteVertex { feature_id, .. }
            | Action::DeleteSegment { feature_id, .. }
            | Action::MoveFeature { feature_id, .. }
            | Action::FlipHorizontal { feature_id, .. }
            | Action::FlipVertical { feature_id, .. }
            | Action::EditSegmentLength { feature_id, .. }
            | Action::AddCurve { feature_id, .. }
            | Action::CloneFeature { feature_id, .. }
            | Action::ConvertToPolygon { feature_id, .. }
            | Action::DrawCircle { feature_id, .. }
            | Action::DrawSquare { feature_id, .. }
            | Action::DeleteFeature { feature_id, .. } => *feature_id,
        }
    }

    /// Short name for history panels and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Action::AddPoint { .. } => "add-point",
            Action::DeleteVertex { .. } => "delete-vertex",
            Action::DeleteSegment { .. } => "delete-segment",
            Action::MoveFeature { .. } => "move-feature",
            Action::FlipHorizontal { .. } => "flip-horizontal",
            Action::FlipVertical { .. } => "flip-vertical",
            Action::EditSegmentLength { .. } => "edit-segment-length",
            Action::AddCurve { .. } => "add-curve",
            Action::CloneFeature { .. } => "clone-feature",
            Action::ConvertToPolygon { .. } => "convert-linestring-to-polygon",
            Action::DrawCircle { .. } => "draw-circle",
            Action::DrawSquare { .. } => "draw-square",
            Action::DeleteFeature { .. } => "delete-geo",
        }
    }
}

// ===== History =====

/// Undo and redo stacks. Contents are mutually exclusive: an action lives on
/// exactly one stack, and any newly recorded action clears redo.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed mutation. Invalidates the redo stack.
    pub fn record(&mut self, action: Action) {
        tracing::debug!(kind = action.kind_name(), feature = %action.feature_id(), "record");
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Whether there is anything to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is anything to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Recorded actions, oldest first (for history panels)
    pub fn undo_entries(&self) -> &[Action] {
        &self.undo_stack
    }

    /// Undone actions awaiting redo, oldest first
    pub fn redo_entries(&self) -> &[Action] {
        &self.redo_stack
    }

    /// Undo the most recent action, applying its inverse to the store.
    ///
    /// Returns the action moved to the redo stack, or `None` when the undo
    /// stack is empty.
    pub fn undo(
        &mut self,
        store: &mut dyn FeatureStore,
        map: &mut dyn MapSurface,
    ) -> Option<Action> {
        let action = self.undo_stack.pop()?;
        tracing::debug!(kind = action.kind_name(), "undo");
        apply_inverse(&action, store, map);
        self.redo_stack.push(action.clone());
        Some(action)
    }

    /// Redo the most recently undone action, reapplying it to the store.
    pub fn redo(
        &mut self,
        store: &mut dyn FeatureStore,
        map: &mut dyn MapSurface,
    ) -> Option<Action> {
        let action = self.redo_stack.pop()?;
        tracing::debug!(kind = action.kind_name(), "redo");
        apply_forward(&action, store, map);
        self.undo_stack.push(action.clone());
        Some(action)
    }
}

// ===== Inverse / reapply =====

/// Restore a feature's coordinates from a snapshot and refresh its labels
fn restore_coords(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    id: FeatureId,
    coords: &[Point],
) {
    if let Some(feature) = store.find_by_id_mut(id) {
        feature.coords = coords.to_vec();
        overlay::recompute_labels(feature, map);
    }
}

/// Detach labels and drop the feature from the store
fn remove_feature(store: &mut dyn FeatureStore, map: &mut dyn MapSurface, id: FeatureId) {
    if let Some(mut feature) = store.remove(id) {
        overlay::clear_labels(&mut feature, map);
    }
}

/// Replace a feature in place: same id, new kind and coordinates
fn replace_feature(
    store: &mut dyn FeatureStore,
    map: &mut dyn MapSurface,
    id: FeatureId,
    kind: GeometryKind,
    coords: &[Point],
) {
    remove_feature(store, map, id);
    let mut feature = match kind {
        GeometryKind::Polygon => Feature::polygon(id, coords.to_vec()),
        GeometryKind::LineString => Feature::line_string(id, coords.to_vec()),
    };
    overlay::recompute_labels(&mut feature, map);
    store.add(feature);
}

fn apply_inverse(action: &Action, store: &mut dyn FeatureStore, map: &mut dyn MapSurface) {
    match action {
        Action::AddPoint {
            feature_id, prev, ..
        } => {
            // Undoing the click that created the feature removes it entirely
            if prev.len() <= 1 {
                remove_feature(store, map, *feature_id);
            } else {
                restore_coords(store, map, *feature_id, prev);
            }
        }
        Action::DeleteVertex {
            feature_id, prev, ..
        }
        | Action::MoveFeature {
            feature_id, prev, ..
        }
        | Action::FlipHorizontal {
            feature_id, prev, ..
        }
        | Action::FlipVertical {
            feature_id, prev, ..
        }
        | Action::EditSegmentLength {
            feature_id, prev, ..
        }
        | Action::AddCurve {
            feature_id, prev, ..
        } => {
            restore_coords(store, map, *feature_id, prev);
        }
        Action::DeleteSegment {
            feature_id,
            prev_kind,
            prev,
            ..
        } => {
            // Rebuild the pre-cut feature (the closed polygon, usually)
            replace_feature(store, map, *feature_id, *prev_kind, prev);
        }
        Action::CloneFeature { feature_id, .. } => {
            remove_feature(store, map, *feature_id);
        }
        Action::ConvertToPolygon {
            feature_id, prev, ..
        } => {
            replace_feature(store, map, *feature_id, GeometryKind::LineString, prev);
        }
        Action::DrawCircle { feature_id, .. } | Action::DrawSquare { feature_id, .. } => {
            remove_feature(store, map, *feature_id);
        }
        Action::DeleteFeature { snapshot, .. } => {
            let mut feature = snapshot.restore();
            overlay::recompute_labels(&mut feature, map);
            store.add(feature);
        }
    }
}

fn apply_forward(action: &Action, store: &mut dyn FeatureStore, map: &mut dyn MapSurface) {
    match action {
        Action::AddPoint {
            feature_id,
            prev,
            new,
            ..
        } => {
            // Redoing the creating click re-adds the feature
            if prev.is_empty() && store.find_by_id(*feature_id).is_none() {
                replace_feature(store, map, *feature_id, GeometryKind::Polygon, new);
            } else {
                restore_coords(store, map, *feature_id, new);
            }
        }
        Action::DeleteVertex {
            feature_id, new, ..
        }
        | Action::MoveFeature {
            feature_id, new, ..
        }
        | Action::FlipHorizontal {
            feature_id, new, ..
        }
        | Action::FlipVertical {
            feature_id, new, ..
        }
        | Action::EditSegmentLength {
            feature_id, new, ..
        }
        | Action::AddCurve {
            feature_id, new, ..
        } => {
            restore_coords(store, map, *feature_id, new);
        }
        Action::DeleteSegment {
            feature_id, new, ..
        } => {
            replace_feature(store, map, *feature_id, GeometryKind::LineString, new);
        }
        Action::CloneFeature {
            feature_id,
            kind,
            new,
        } => {
            replace_feature(store, map, *feature_id, *kind, new);
        }
        Action::ConvertToPolygon {
            feature_id, new, ..
        } => {
            replace_feature(store, map, *feature_id, GeometryKind::Polygon, new);
        }
        Action::DrawCircle { feature_id, coords } => {
            remove_feature(store, map, *feature_id);
            let mut circle = Feature::polygon(*feature_id, coords.clone());
            circle.no_measurements = true;
            store.add(circle);
        }
        Action::DrawSquare { feature_id, coords } => {
            replace_feature(store, map, *feature_id, GeometryKind::Polygon, coords);
        }
        Action::DeleteFeature { feature_id, .. } => {
            remove_feature(store, map, *feature_id);
        }
    }
}
