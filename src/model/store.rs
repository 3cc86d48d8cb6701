// Copyright 2025 the Parcelsketch Authors
// SPDX-License-Identifier: Apache-2.0

//! The feature store abstraction.
//!
//! The engine never assumes how features are stored; it goes through this
//! trait for create/remove/iterate/find-by-id. `MemoryStore` is the plain
//! Vec-backed implementation used by tests and headless hosts.

use super::{Feature, FeatureId};

/// Storage for all features on the map
pub trait FeatureStore {
    /// Add a feature to the store
    fn add(&mut self, feature: Feature);

    /// Remove a feature by id, returning it if present
    fn remove(&mut self, id: FeatureId) -> Option<Feature>;

    /// All features, in insertion order
    fn all(&self) -> &[Feature];

    /// All features, mutable, in insertion order
    fn all_mut(&mut self) -> &mut [Feature];

    /// Find a feature by id
    fn find_by_id(&self, id: FeatureId) -> Option<&Feature> {
        self.all().iter().find(|f| f.id == id)
    }

    /// Find a feature by id, mutable
    fn find_by_id_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.all_mut().iter_mut().find(|f| f.id == id)
    }
}

/// In-memory feature store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    features: Vec<Feature>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of features currently stored
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureStore for MemoryStore {
    fn add(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let idx = self.features.iter().position(|f| f.id == id)?;
        Some(self.features.remove(idx))
    }

    fn all(&self) -> &[Feature] {
        &self.features
    }

    fn all_mut(&mut self) -> &mut [Feature] {
        &mut self.features
    }
}
