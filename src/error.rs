// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Error type for rejected edits.
//!
//! Every mutating operation validates fully before applying any change, so an
//! `EditError` always means "nothing happened". The messages are meant to be
//! shown to the user verbatim; none of these conditions are fatal to the
//! session.

use crate::model::GeometryKind;
use thiserror::Error;

/// A rejected edit. No geometry was mutated and no history entry was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The requested segment does not exist on the feature.
    #[error("segment {0} is out of range")]
    SegmentOutOfRange(usize),

    /// The requested vertex does not exist on the feature.
    #[error("vertex {0} is out of range")]
    VertexOutOfRange(usize),

    /// The segment's current length is zero, so its direction is undefined.
    #[error("cannot resize a zero-length segment")]
    ZeroLengthSegment,

    /// The curve's straight chord has zero length, so the perpendicular (and
    /// therefore the control point) is undefined.
    #[error("cannot add a curve with a zero-length chord")]
    ZeroLengthChord,

    /// Removal would drop the feature below its kind's minimum vertex count.
    #[error("at least {min} points are required for a {kind:?}")]
    BelowMinimumVertices {
        /// Geometry kind whose minimum was violated
        kind: GeometryKind,
        /// Minimum point count for the kind
        min: usize,
    },

    /// The edit would produce an invalid ring or sequence (duplicate
    /// consecutive points, or too few points).
    #[error("this change would make the {0:?} invalid")]
    InvalidGeometry(GeometryKind),
}
