// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! The edit session: one value owning all interaction state.
//!
//! `EditSession` holds the feature store, the history log, the active mode
//! and every piece of transient gesture state (in-progress feature, ghost
//! preview, hover highlight, drag snapshot, quick-shape anchor). The host
//! forwards input events to the entry points here; each successful mutation
//! records exactly one history entry and refreshes the affected feature's
//! measurement labels. The map surface is borrowed per event, never stored.

use crate::editing::hit_test::{hit_test, Hit, HitKind};
use crate::editing::{curve, dimension, segments, shapes, transform};
use crate::error::EditError;
use crate::history::{Action, History};
use crate::model::{
    close_ring, open_ring, ring_is_valid, Feature, FeatureId, FeatureStore, GeometryKind,
    MemoryStore,
};
use crate::overlay::{self, Label, LabelId, LabelKind};
use crate::settings;
use crate::snapping::{edge_snap_offset, vertex_snap};
use crate::surface::{rotate_vec, MapSurface, RotateCommand};
use crate::units::feet_to_meters;
use kurbo::{Point, Vec2};
use std::f64::consts::FRAC_PI_2;

// ===== Mode =====

/// The active interaction mode. Governs which gesture entry points do
/// anything; transitions happen only on explicit commands or on gesture
/// completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Click-to-append polygon drawing
    Draw,
    /// Selection, rigid-move dragging, transforms
    Select,
    /// Single-shot circle tool
    Circle,
    /// Single-shot square tool
    Square,
    /// No tool active
    #[default]
    Idle,
}

/// Screen direction for a keyboard nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    fn unit(self) -> Vec2 {
        match self {
            NudgeDirection::Right => Vec2::new(1.0, 0.0),
            NudgeDirection::Left => Vec2::new(-1.0, 0.0),
            NudgeDirection::Up => Vec2::new(0.0, 1.0),
            NudgeDirection::Down => Vec2::new(0.0, -1.0),
        }
    }
}

/// Pre-drag snapshot held for the duration of one move gesture
#[derive(Debug, Clone)]
struct DragState {
    feature_id: FeatureId,
    origin: Vec<Point>,
}

// ===== EditSession =====

/// All mutable editing state for one session.
///
/// Single-threaded by design: every entry point runs synchronously inside
/// the host's input-event handler, so history entries never interleave.
pub struct EditSession {
    mode: Mode,
    store: Box<dyn FeatureStore>,
    history: History,
    /// Currently selected feature (select mode)
    selected: Option<FeatureId>,
    /// Feature under active construction (draw mode)
    drawing: Option<FeatureId>,
    /// Snapped preview point shown at the pointer while drawing
    ghost: Option<Point>,
    /// Hovered segment, target of resize and rotate-to-segment
    hover_segment: Option<(FeatureId, usize)>,
    /// Raw dimension text box contents
    dimension_text: String,
    /// Arrow-key nudge distance, meters
    nudge_offset: f64,
    /// Held modifier that disables both snap policies
    snap_suppressed: bool,
    drag: Option<DragState>,
    /// Center anchor of an in-progress quick shape
    shape_start: Option<Point>,
    /// Live side-length readout while dragging a square out
    shape_label: Option<Label>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// New session over an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// New session over a host-supplied store
    pub fn with_store(store: Box<dyn FeatureStore>) -> Self {
        EditSession {
            mode: Mode::Idle,
            store,
            history: History::new(),
            selected: None,
            drawing: None,
            ghost: None,
            hover_segment: None,
            dimension_text: String::new(),
            nudge_offset: settings::nudge::DEFAULT_OFFSET,
            snap_suppressed: false,
            drag: None,
            shape_start: None,
            shape_label: None,
        }
    }

    // ===== Accessors =====

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn store(&self) -> &dyn FeatureStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn FeatureStore {
        self.store.as_mut()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selected
    }

    /// Feature currently under construction, if any
    pub fn drawing(&self) -> Option<FeatureId> {
        self.drawing
    }

    /// Snapped preview point for the host to render while drawing
    pub fn ghost(&self) -> Option<Point> {
        self.ghost
    }

    pub fn hover_segment(&self) -> Option<(FeatureId, usize)> {
        self.hover_segment
    }

    /// Current nudge distance in meters
    pub fn nudge_offset(&self) -> f64 {
        self.nudge_offset
    }

    pub fn dimension_text(&self) -> &str {
        &self.dimension_text
    }

    // ===== Mode & modifiers =====

    /// Switch the active tool. Transient gesture state is dropped; an
    /// unfinished drawing stays on the map and can be resumed.
    pub fn set_mode(&mut self, map: &mut dyn MapSurface, mode: Mode) {
        tracing::debug!(?mode, "set mode");
        self.ghost = None;
        self.shape_start = None;
        self.detach_shape_label(map);
        if mode != Mode::Select {
            self.hover_segment = None;
        }
        self.mode = mode;
    }

    /// Held-modifier state that suppresses vertex and edge snapping
    pub fn set_snap_suppressed(&mut self, suppressed: bool) {
        self.snap_suppressed = suppressed;
    }

    /// Update the dimension text box. A bare positive number also becomes
    /// the new nudge distance (feet) immediately, without a commit.
    pub fn set_dimension_text(&mut self, text: &str) {
        self.dimension_text = text.to_string();
        if let Ok(feet) = text.trim().parse::<f64>() {
            if feet > 0.0 && feet.is_finite() {
                self.nudge_offset = feet_to_meters(feet);
                tracing::debug!(feet, "nudge offset updated");
            }
        }
    }

    // ===== Pointer tracking =====

    /// Track pointer motion: ghost preview in draw mode, hover highlight in
    /// select mode, live side-length readout while dragging a square out.
    pub fn pointer_move(&mut self, map: &mut dyn MapSurface, pixel: Point) {
        match self.mode {
            Mode::Draw => {
                self.ghost = Some(self.resolve_draw_point(map, pixel));
            }
            Mode::Select => {
                self.hover_segment = match hit_test(map, self.store.as_ref(), pixel) {
                    Some(Hit {
                        feature_id,
                        index,
                        kind: HitKind::Edge,
                    }) => Some((feature_id, index)),
                    _ => None,
                };
            }
            Mode::Square => {
                if let Some(center) = self.shape_start {
                    let corner = map.project_to_coordinate(pixel);
                    self.detach_shape_label(map);
                    let label = Label {
                        id: LabelId::next(),
                        text: shapes::square_side_text(center, corner),
                        anchor: corner,
                        kind: LabelKind::Length,
                    };
                    map.attach_overlay(&label);
                    self.shape_label = Some(label);
                }
            }
            Mode::Circle | Mode::Idle => {}
        }
    }

    /// Snap the pointer to the nearest feature vertex, falling back to the
    /// raw projected coordinate; a held modifier skips snapping entirely.
    fn resolve_draw_point(&self, map: &dyn MapSurface, pixel: Point) -> Point {
        if self.snap_suppressed {
            return map.project_to_coordinate(pixel);
        }
        vertex_snap(
            map,
            self.store.as_ref(),
            pixel,
            settings::snap::VERTEX_TOLERANCE,
        )
        .unwrap_or_else(|| map.project_to_coordinate(pixel))
    }

    // ===== Drawing =====

    /// A click in draw mode: start a polygon, append a vertex, or consume an
    /// existing line whose endpoint was clicked.
    pub fn draw_click(&mut self, map: &mut dyn MapSurface, pixel: Point) {
        if self.mode != Mode::Draw {
            return;
        }
        let point = self.resolve_draw_point(map, pixel);
        self.ghost = Some(point);

        if let Some(id) = self.drawing {
            if let Some(action) = self.append_vertex(map, id, point) {
                self.history.record(action);
            }
            return;
        }

        // A click on an open line's endpoint consumes it into a polygon
        if let Some((line_id, reverse)) = self.line_endpoint_at(point) {
            if let Some(action) =
                segments::consume_line_into_polygon(self.store.as_mut(), map, line_id, reverse)
            {
                self.history.record(action);
                self.drawing = Some(line_id);
            }
            return;
        }

        let id = FeatureId::next();
        let feature = Feature::polygon(id, vec![point]);
        let coords = feature.coords.clone();
        self.store.add(feature);
        self.drawing = Some(id);
        tracing::debug!(feature = %id, ?point, "drawing started");
        self.history.record(Action::AddPoint {
            feature_id: id,
            prev: Vec::new(),
            new: coords,
            point,
            index: 0,
        });
    }

    /// Find an open line with an endpoint exactly at `point`. The flag says
    /// whether the line must be reversed so the clicked endpoint leads.
    fn line_endpoint_at(&self, point: Point) -> Option<(FeatureId, bool)> {
        for feature in self.store.all() {
            if feature.kind != GeometryKind::LineString {
                continue;
            }
            if feature.coords.first() == Some(&point) {
                return Some((feature.id, false));
            }
            if feature.coords.last() == Some(&point) {
                return Some((feature.id, true));
            }
        }
        None
    }

    /// Append one vertex before the closing point of the drawing feature.
    /// A point equal to the last placed vertex is ignored (no duplicate).
    fn append_vertex(
        &mut self,
        map: &mut dyn MapSurface,
        id: FeatureId,
        point: Point,
    ) -> Option<Action> {
        let feature = self.store.find_by_id_mut(id)?;
        if feature.last_real_vertex() == Some(point) {
            return None;
        }

        let prev = feature.coords.clone();
        open_ring(&mut feature.coords);
        feature.coords.push(point);
        let index = feature.coords.len() - 1;
        close_ring(&mut feature.coords);
        overlay::recompute_labels(feature, map);

        Some(Action::AddPoint {
            feature_id: id,
            prev,
            new: feature.coords.clone(),
            point,
            index,
        })
    }

    /// Close the in-progress ring and hand it off to select mode.
    ///
    /// Requires at least three distinct vertices; a rejected finish leaves
    /// the drawing in progress.
    pub fn finish_shape(&mut self, map: &mut dyn MapSurface) -> Result<(), EditError> {
        let Some(id) = self.drawing else {
            return Ok(());
        };
        let Some(feature) = self.store.find_by_id_mut(id) else {
            self.drawing = None;
            return Ok(());
        };

        if feature.coords.len() < GeometryKind::Polygon.min_points() {
            return Err(EditError::BelowMinimumVertices {
                kind: GeometryKind::Polygon,
                min: GeometryKind::Polygon.min_points(),
            });
        }
        if !ring_is_valid(&feature.coords, GeometryKind::Polygon) {
            return Err(EditError::InvalidGeometry(GeometryKind::Polygon));
        }
        overlay::recompute_labels(feature, map);

        tracing::debug!(feature = %id, "shape finished");
        self.drawing = None;
        self.ghost = None;
        self.selected = Some(id);
        self.mode = Mode::Select;
        Ok(())
    }

    /// Commit the dimension text box against the drawing feature.
    ///
    /// Unparsable or non-positive text is ignored silently; a successful
    /// commit appends one vertex and clears the box.
    pub fn commit_dimension(&mut self, map: &mut dyn MapSurface) {
        let Some(input) = dimension::parse(&self.dimension_text) else {
            return;
        };
        let Some(id) = self.drawing else {
            return;
        };
        let Some(last) = self.store.find_by_id(id).and_then(Feature::last_real_vertex)
        else {
            return;
        };

        let point = last + input.displacement_meters(map.rotation());
        if let Some(action) = self.append_vertex(map, id, point) {
            self.history.record(action);
            self.dimension_text.clear();
        }
    }

    /// Arrow-key nudge: append a vertex offset by the current nudge distance
    /// in the given screen direction, rotated into map coordinates.
    pub fn nudge(&mut self, map: &mut dyn MapSurface, direction: NudgeDirection) {
        let Some(id) = self.drawing else {
            return;
        };
        let Some(last) = self.store.find_by_id(id).and_then(Feature::last_real_vertex)
        else {
            return;
        };

        let offset = rotate_vec(direction.unit() * self.nudge_offset, map.rotation());
        if let Some(action) = self.append_vertex(map, id, last + offset) {
            self.history.record(action);
        }
    }

    /// Append a sampled curve to the drawing feature
    pub fn add_curve(
        &mut self,
        map: &mut dyn MapSurface,
        rise_feet: f64,
        run_feet: f64,
        bulge_feet: f64,
    ) -> Result<(), EditError> {
        let Some(id) = self.drawing else {
            return Ok(());
        };
        let Some(feature) = self.store.find_by_id_mut(id) else {
            return Ok(());
        };
        let action = curve::add_curve(feature, map, rise_feet, run_feet, bulge_feet)?;
        self.history.record(action);
        Ok(())
    }

    // ===== Segment & vertex edits =====

    /// Resize one segment to an exact length in feet
    pub fn set_segment_length(
        &mut self,
        map: &mut dyn MapSurface,
        id: FeatureId,
        index: usize,
        new_length_feet: f64,
    ) -> Result<(), EditError> {
        let Some(feature) = self.store.find_by_id_mut(id) else {
            return Ok(());
        };
        let action = segments::set_segment_length(feature, map, index, new_length_feet)?;
        self.history.record(action);
        // keep the edited segment highlighted for a follow-up resize
        self.hover_segment = Some((id, index));
        Ok(())
    }

    /// Resize the hovered segment from typed text. Text that does not parse
    /// as a positive number is ignored silently.
    pub fn resize_highlighted(
        &mut self,
        map: &mut dyn MapSurface,
        text: &str,
    ) -> Result<(), EditError> {
        let Some((id, index)) = self.hover_segment else {
            return Ok(());
        };
        let Ok(feet) = text.trim().parse::<f64>() else {
            return Ok(());
        };
        if !(feet > 0.0) || !feet.is_finite() {
            return Ok(());
        }
        self.set_segment_length(map, id, index, feet)
    }

    /// Remove one vertex (context-menu command)
    pub fn delete_vertex(
        &mut self,
        map: &mut dyn MapSurface,
        id: FeatureId,
        index: usize,
    ) -> Result<(), EditError> {
        let Some(feature) = self.store.find_by_id_mut(id) else {
            return Ok(());
        };
        let action = segments::delete_vertex(feature, map, index)?;
        self.history.record(action);
        Ok(())
    }

    /// Cut one segment (context-menu command). A polygon opens into a line
    /// under the same id.
    pub fn delete_segment(
        &mut self,
        map: &mut dyn MapSurface,
        id: FeatureId,
        index: usize,
    ) -> Result<(), EditError> {
        if self.store.find_by_id(id).is_none() {
            return Ok(());
        }
        let action = segments::delete_segment(self.store.as_mut(), map, id, index)?;
        self.history.record(action);
        self.hover_segment = None;
        Ok(())
    }

    /// Resolve a context-menu target from a pointer position
    pub fn context_target(&self, map: &dyn MapSurface, pixel: Point) -> Option<Hit> {
        hit_test(map, self.store.as_ref(), pixel)
    }

    // ===== Selection & rigid move =====

    /// Select whatever feature is under the pointer, or clear the selection
    pub fn select_at(&mut self, map: &dyn MapSurface, pixel: Point) -> Option<FeatureId> {
        self.selected = hit_test(map, self.store.as_ref(), pixel).map(|hit| hit.feature_id);
        self.selected
    }

    /// Begin a rigid-move drag of the selected feature. Snapshots the
    /// pre-drag coordinates and hides the labels for the gesture's duration.
    pub fn begin_drag(&mut self, map: &mut dyn MapSurface) {
        if self.mode != Mode::Select || self.drag.is_some() {
            return;
        }
        let Some(id) = self.selected else {
            return;
        };
        let Some(feature) = self.store.find_by_id_mut(id) else {
            return;
        };
        let origin = feature.coords.clone();
        overlay::clear_labels(feature, map);
        tracing::debug!(feature = %id, "drag started");
        self.drag = Some(DragState {
            feature_id: id,
            origin,
        });
    }

    /// One drag frame: translate rigidly by `delta` (map units), then apply
    /// edge snapping unless the suppress modifier is held. Intermediate
    /// frames produce no history entries.
    pub fn drag_by(&mut self, map: &mut dyn MapSurface, delta: Vec2) {
        let Some(drag) = &self.drag else {
            return;
        };
        let id = drag.feature_id;
        let Some(feature) = self.store.find_by_id_mut(id) else {
            return;
        };
        transform::translate_feature(feature, delta);

        if !self.snap_suppressed {
            let feature = match self.store.find_by_id(id) {
                Some(f) => f,
                None => return,
            };
            if let Some(offset) = edge_snap_offset(
                map,
                feature,
                self.store.as_ref(),
                settings::snap::EDGE_TOLERANCE,
            ) {
                if let Some(feature) = self.store.find_by_id_mut(id) {
                    transform::translate_feature(feature, offset);
                }
            }
        }
    }

    /// Finish the drag: recompute labels and record one `MoveFeature` entry
    /// covering the whole gesture. A drag that went nowhere records nothing.
    pub fn end_drag(&mut self, map: &mut dyn MapSurface) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some(feature) = self.store.find_by_id_mut(drag.feature_id) else {
            return;
        };
        overlay::recompute_labels(feature, map);
        if feature.coords == drag.origin {
            return;
        }
        let new = feature.coords.clone();
        tracing::debug!(feature = %drag.feature_id, "drag finished");
        self.history.record(Action::MoveFeature {
            feature_id: drag.feature_id,
            prev: drag.origin,
            new,
        });
    }

    /// Abort the drag, restoring the pre-drag coordinates. No history entry.
    pub fn cancel_drag(&mut self, map: &mut dyn MapSurface) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if let Some(feature) = self.store.find_by_id_mut(drag.feature_id) {
            feature.coords = drag.origin;
            overlay::recompute_labels(feature, map);
        }
    }

    // ===== Transforms =====

    /// Mirror the selected feature about its bounding box's vertical midline
    pub fn flip_horizontal(&mut self, map: &mut dyn MapSurface) {
        self.flip(map, transform::FlipAxis::Horizontal);
    }

    /// Mirror the selected feature about its bounding box's horizontal
    /// midline
    pub fn flip_vertical(&mut self, map: &mut dyn MapSurface) {
        self.flip(map, transform::FlipAxis::Vertical);
    }

    fn flip(&mut self, map: &mut dyn MapSurface, axis: transform::FlipAxis) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(feature) = self.store.find_by_id_mut(id) else {
            return;
        };
        let action = transform::flip(feature, map, axis);
        self.history.record(action);
    }

    /// Duplicate the selected feature, offset right by its own width. The
    /// clone becomes the selection.
    pub fn clone_selected(&mut self, map: &mut dyn MapSurface) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some(action) = transform::clone_feature(self.store.as_mut(), map, id) {
            self.selected = Some(action.feature_id());
            self.history.record(action);
        }
    }

    /// Delete the selected feature outright
    pub fn delete_selected(&mut self, map: &mut dyn MapSurface) {
        let Some(id) = self.selected.take() else {
            return;
        };
        if let Some(action) = transform::delete_feature(self.store.as_mut(), map, id) {
            self.history.record(action);
        }
        if self.hover_segment.is_some_and(|(fid, _)| fid == id) {
            self.hover_segment = None;
        }
    }

    // ===== History =====

    /// Undo the most recent action
    pub fn undo(&mut self, map: &mut dyn MapSurface) {
        self.history.undo(self.store.as_mut(), map);
        self.prune_dangling();
    }

    /// Redo the most recently undone action
    pub fn redo(&mut self, map: &mut dyn MapSurface) {
        let redone = self.history.redo(self.store.as_mut(), map);
        // Redoing a draw step while still in draw mode resumes the drawing
        if let Some(Action::AddPoint { feature_id, .. } | Action::ConvertToPolygon { feature_id, .. }) =
            redone
        {
            if self.mode == Mode::Draw && self.drawing.is_none() {
                self.drawing = Some(feature_id);
            }
        }
        self.prune_dangling();
    }

    /// Drop references to features that history just removed. An in-progress
    /// drawing must stay a polygon; undoing a line conversion reverts the
    /// kind, so the drawing reference is dropped along with missing features.
    fn prune_dangling(&mut self) {
        if self
            .drawing
            .is_some_and(|id| !self.store.find_by_id(id).is_some_and(Feature::is_polygon))
        {
            self.drawing = None;
            self.ghost = None;
        }
        if self
            .selected
            .is_some_and(|id| self.store.find_by_id(id).is_none())
        {
            self.selected = None;
        }
        if self
            .hover_segment
            .is_some_and(|(id, _)| self.store.find_by_id(id).is_none())
        {
            self.hover_segment = None;
        }
    }

    // ===== View commands =====

    /// Rotation that makes the hovered segment vertical on screen, centered
    /// on its midpoint. Returned to the host; the engine never mutates the
    /// map view itself.
    pub fn rotate_to_highlight(&self, _map: &dyn MapSurface) -> Option<RotateCommand> {
        let (id, index) = self.hover_segment?;
        let feature = self.store.find_by_id(id)?;
        let a = *feature.coords.get(index)?;
        let b = *feature.coords.get(index + 1)?;
        let d = b - a;
        if d.hypot() == 0.0 {
            return None;
        }
        Some(RotateCommand {
            center: a.midpoint(b),
            rotation: d.y.atan2(d.x) - FRAC_PI_2,
        })
    }

    // ===== Quick shapes =====

    /// Anchor a quick shape's center at the pointer
    pub fn shape_begin(&mut self, map: &mut dyn MapSurface, pixel: Point) {
        if !matches!(self.mode, Mode::Circle | Mode::Square) {
            return;
        }
        self.shape_start = Some(map.project_to_coordinate(pixel));
    }

    /// Commit the quick shape out to the pointer and return to select mode
    pub fn shape_commit(&mut self, map: &mut dyn MapSurface, pixel: Point) {
        let Some(center) = self.shape_start.take() else {
            return;
        };
        self.detach_shape_label(map);
        let outer = map.project_to_coordinate(pixel);

        let action = match self.mode {
            Mode::Circle => shapes::draw_circle(self.store.as_mut(), center, outer),
            Mode::Square => shapes::draw_square(self.store.as_mut(), map, center, outer),
            _ => None,
        };
        if let Some(action) = action {
            self.selected = Some(action.feature_id());
            self.history.record(action);
            self.mode = Mode::Select;
        }
    }

    fn detach_shape_label(&mut self, map: &mut dyn MapSurface) {
        if let Some(label) = self.shape_label.take() {
            map.detach_overlay(&label);
        }
    }
}
