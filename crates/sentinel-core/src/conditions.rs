//! Per-condition acceptance flags (terms the user has agreed to).

use std::collections::BTreeMap;

use crate::error::Result;
use crate::registry::NamespacedRegistry;
use crate::store::{Store, NS_ACCEPTED_CONDITIONS};

pub struct AcceptedConditions<'a> {
    registry: NamespacedRegistry<'a, bool>,
}

impl<'a> AcceptedConditions<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            registry: NamespacedRegistry::new(store, NS_ACCEPTED_CONDITIONS, "condition key"),
        }
    }

    pub fn fetch_all(&self) -> Result<BTreeMap<String, bool>> {
        self.registry.fetch_all()
    }

    /// Whether a condition was accepted; unknown conditions read as not
    /// accepted.
    pub fn is_accepted(&self, key: &str) -> Result<bool> {
        self.registry.fetch_one(key)
    }

    pub fn save(&self, key: &str, accepted: bool) -> Result<bool> {
        self.registry.save_one(key, accepted)
    }
}
