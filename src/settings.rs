// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Engine settings and tunable constants.
//!
//! Everything here is a compile-time tunable: snap tolerances, overlay
//! offsets, curve sampling bounds. Visual styling is the host's concern and
//! does not appear in this crate.

// ============================================================================
// SNAP SETTINGS
// ============================================================================
/// Pixel tolerance for vertex snapping while drawing or hovering
const SNAP_VERTEX_TOLERANCE: f64 = 25.0;

/// Pixel tolerance for rigid edge snapping while moving a feature
const SNAP_EDGE_TOLERANCE: f64 = 10.0;

// ============================================================================
// HIT TEST SETTINGS
// ============================================================================
/// Pixel tolerance for vertex/segment hit testing (hover, context menu)
const HIT_TOLERANCE: f64 = 8.0;

// ============================================================================
// MEASUREMENT OVERLAY SETTINGS
// ============================================================================
/// Perpendicular pixel offset of a segment-length label from its segment
const LABEL_SEGMENT_OFFSET: f64 = 17.0;

/// Angle labels sit along the bisector at this fraction of the segment offset
const LABEL_ANGLE_OFFSET_FACTOR: f64 = 0.8;

/// Interior angles within this many degrees of 90 or 180 get no label
const ANGLE_SUPPRESS_EPSILON: f64 = 0.01;

// ============================================================================
// CURVE SETTINGS
// ============================================================================
/// Minimum number of generated curve points
const CURVE_MIN_SAMPLES: usize = 4;

/// Maximum number of generated curve points
const CURVE_MAX_SAMPLES: usize = 16;

// ============================================================================
// NUDGE SETTINGS
// ============================================================================
/// Default arrow-key nudge offset in meters (5 ft)
const NUDGE_DEFAULT_OFFSET: f64 = 1.524;

// ============================================================================
// QUICK SHAPE SETTINGS
// ============================================================================
/// Number of sides used to approximate a circle as a polygon
const CIRCLE_SIDES: usize = 64;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Snapping tolerances (screen pixels)
pub mod snap {
    /// Vertex snap tolerance for draw/hover pointer tracking
    pub const VERTEX_TOLERANCE: f64 = super::SNAP_VERTEX_TOLERANCE;

    /// Edge snap tolerance for rigid feature moves
    pub const EDGE_TOLERANCE: f64 = super::SNAP_EDGE_TOLERANCE;
}

/// Hit-test tolerances (screen pixels)
pub mod hit_test {
    /// Vertex and segment hit tolerance
    pub const TOLERANCE: f64 = super::HIT_TOLERANCE;
}

/// Measurement overlay placement
pub mod overlay {
    /// Perpendicular offset of length labels (pixels)
    pub const SEGMENT_OFFSET: f64 = super::LABEL_SEGMENT_OFFSET;

    /// Bisector offset of angle labels (pixels)
    pub const ANGLE_OFFSET: f64 =
        super::LABEL_SEGMENT_OFFSET * super::LABEL_ANGLE_OFFSET_FACTOR;

    /// Suppression window around 90 and 180 degrees
    pub const ANGLE_SUPPRESS_EPSILON: f64 = super::ANGLE_SUPPRESS_EPSILON;
}

/// Curve insertion sampling bounds
pub mod curve {
    /// Minimum generated points per curve
    pub const MIN_SAMPLES: usize = super::CURVE_MIN_SAMPLES;

    /// Maximum generated points per curve
    pub const MAX_SAMPLES: usize = super::CURVE_MAX_SAMPLES;
}

/// Arrow-key nudge settings
pub mod nudge {
    /// Default offset in meters when no dimension text overrides it
    pub const DEFAULT_OFFSET: f64 = super::NUDGE_DEFAULT_OFFSET;
}

/// Quick-shape tool settings
pub mod shapes {
    /// Polygon side count for the circle tool
    pub const CIRCLE_SIDES: usize = super::CIRCLE_SIDES;
}
