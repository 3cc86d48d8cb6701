// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Parcelsketch: an interactive parcel drawing and measurement engine.
//!
//! This crate is the headless core of a map parcel editor: the coordinate
//! data model, vertex/edge snapping, measurement overlays, curve and segment
//! editing, and a full undo/redo history. The host application supplies the
//! map surface (projection, rotation, overlay attachment) through the
//! [`MapSurface`] trait and forwards input events to an [`EditSession`].
//! Everything else lives here: ring-closure invariants, snapping tolerances,
//! label lifecycle, and the per-action undo rules.
//!
//! Distances entering the engine are feet (the parcel-drawing convention);
//! all stored coordinates are meters. See [`units`] for the conversions and
//! display formatting.

pub mod editing;
pub mod error;
pub mod history;
pub mod model;
pub mod overlay;
pub mod settings;
pub mod snapping;
pub mod surface;
pub mod units;

pub use editing::{EditSession, FlipAxis, Hit, HitKind, Mode, NudgeDirection};
pub use error::EditError;
pub use history::{Action, History};
pub use model::{Feature, FeatureId, FeatureSnapshot, FeatureStore, GeometryKind, MemoryStore};
pub use overlay::{Label, LabelId, LabelKind};
pub use surface::{MapSurface, PlanarSurface, RotateCommand};
