// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for features.
//!
//! Each `FeatureId` is a monotonically increasing `u64` generated from a
//! global atomic counter. An id is immutable for the life of its feature, and
//! deliberately survives in-place replacement: when a delete-segment cut
//! turns a polygon into a line (or a line is consumed into a polygon), the
//! replacement feature keeps the old id so history entries keep resolving.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique, opaque identifier for a feature
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FeatureId(u64);

static FEATURE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl FeatureId {
    /// Create a new unique feature ID
    pub fn next() -> Self {
        Self(FEATURE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::next()
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
