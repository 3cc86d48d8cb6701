// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Interactive editing: the session controller and the operations it drives.

pub mod curve;
pub mod dimension;
pub mod hit_test;
pub mod segments;
pub mod session;
pub mod shapes;
pub mod transform;

pub use hit_test::{hit_test, Hit, HitKind};
pub use session::{EditSession, Mode, NudgeDirection};
pub use transform::FlipAxis;
