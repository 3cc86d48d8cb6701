// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Parcel data model

pub mod feature;
pub mod feature_id;
pub mod store;

pub use feature::{
    close_ring, open_ring, ring_is_valid, Feature, FeatureSnapshot, GeometryKind,
};
pub use feature_id::FeatureId;
pub use store::{FeatureStore, MemoryStore};
