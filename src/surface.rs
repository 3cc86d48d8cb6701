// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! The map surface abstraction.
//!
//! The engine runs headless; everything pixel-related (projection, view
//! rotation, overlay attachment) goes through `MapSurface`, implemented by
//! the host's map widget. `PlanarSurface` is the built-in reference
//! implementation: a uniform scale plus view rotation, y-up, used by the unit
//! tests and by headless hosts.

use crate::overlay::Label;
use kurbo::{Point, Vec2};

/// Host-provided map surface: projection and overlay attachment
pub trait MapSurface {
    /// Project a map coordinate (meters) to screen pixels
    fn project_to_pixel(&self, coord: Point) -> Point;

    /// Project a screen pixel back to a map coordinate
    fn project_to_coordinate(&self, pixel: Point) -> Point;

    /// Current view rotation in radians
    fn rotation(&self) -> f64;

    /// Attach an overlay label to the surface
    fn attach_overlay(&mut self, label: &Label);

    /// Detach a previously attached overlay label
    fn detach_overlay(&mut self, label: &Label);
}

/// A view-rotation request computed by the engine.
///
/// The engine never mutates the host's view; when the user asks to rotate the
/// map to a highlighted segment, the engine hands this back and the host
/// animates its own camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateCommand {
    /// Map coordinate to center the view on (the segment midpoint)
    pub center: Point,
    /// Absolute view rotation in radians that makes the segment vertical
    pub rotation: f64,
}

/// Rotate a displacement vector by `radians` (counter-clockwise)
pub(crate) fn rotate_vec(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Reference map surface: uniform pixels-per-meter scale and a view rotation.
///
/// Identity projection at `scale = 1.0`, `rotation = 0.0`. Attached labels
/// are counted so tests can assert the attach/detach lifecycle balances.
#[derive(Debug, Clone)]
pub struct PlanarSurface {
    /// Pixels per meter
    pub scale: f64,
    /// View rotation in radians
    pub rotation: f64,
    /// Number of currently attached overlay labels
    pub attached: usize,
}

impl Default for PlanarSurface {
    fn default() -> Self {
        PlanarSurface {
            scale: 1.0,
            rotation: 0.0,
            attached: 0,
        }
    }
}

impl PlanarSurface {
    /// Identity surface: 1 px per meter, no rotation
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface with the given pixels-per-meter scale
    pub fn with_scale(scale: f64) -> Self {
        PlanarSurface {
            scale,
            ..Self::default()
        }
    }
}

impl MapSurface for PlanarSurface {
    fn project_to_pixel(&self, coord: Point) -> Point {
        let scaled = Vec2::new(coord.x * self.scale, coord.y * self.scale);
        rotate_vec(scaled, -self.rotation).to_point()
    }

    fn project_to_coordinate(&self, pixel: Point) -> Point {
        let unrotated = rotate_vec(pixel.to_vec2(), self.rotation);
        Point::new(unrotated.x / self.scale, unrotated.y / self.scale)
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn attach_overlay(&mut self, _label: &Label) {
        self.attached += 1;
    }

    fn detach_overlay(&mut self, _label: &Label) {
        self.attached = self.attached.saturating_sub(1);
    }
}
