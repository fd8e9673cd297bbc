//! Per-feature enable flags.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::registry::NamespacedRegistry;
use crate::store::{Store, NS_ENABLED_FEATURES};

pub struct FeatureFlags<'a> {
    registry: NamespacedRegistry<'a, bool>,
}

impl<'a> FeatureFlags<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            registry: NamespacedRegistry::new(store, NS_ENABLED_FEATURES, "feature key"),
        }
    }

    pub fn fetch_all(&self) -> Result<BTreeMap<String, bool>> {
        self.registry.fetch_all()
    }

    /// Whether a feature is enabled; unknown features read as disabled.
    pub fn is_enabled(&self, key: &str) -> Result<bool> {
        self.registry.fetch_one(key)
    }

    pub fn save(&self, key: &str, enabled: bool) -> Result<bool> {
        self.registry.save_one(key, enabled)
    }
}
