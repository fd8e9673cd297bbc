//! Runtime permission map: permission name → granted.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::registry::NamespacedRegistry;
use crate::store::{Store, NS_PERMISSIONS};

pub struct Permissions<'a> {
    registry: NamespacedRegistry<'a, bool>,
}

impl<'a> Permissions<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            registry: NamespacedRegistry::new(store, NS_PERMISSIONS, "permission key"),
        }
    }

    pub fn fetch_all(&self) -> Result<BTreeMap<String, bool>> {
        self.registry.fetch_all()
    }

    /// Whether a permission is recorded as granted; unknown keys read as
    /// not granted.
    pub fn is_granted(&self, key: &str) -> Result<bool> {
        self.registry.fetch_one(key)
    }

    pub fn save(&self, key: &str, granted: bool) -> Result<bool> {
        self.registry.save_one(key, granted)
    }

    /// Bulk-replaces the stored map.
    ///
    /// When the incoming map has fewer keys than are stored, the
    /// namespace is cleared first so keys dropped from the app's
    /// declared set leave no stale entries. Only entries whose value
    /// differs from the stored one are rewritten. Returns the input
    /// mapping unchanged.
    pub fn save_all(&self, permissions: BTreeMap<String, bool>) -> Result<BTreeMap<String, bool>> {
        let doc = self.registry.document()?;
        let mut stored: BTreeMap<String, bool> = doc
            .all()
            .iter()
            .filter_map(|(key, value)| value.as_bool().map(|b| (key.clone(), b)))
            .collect();

        let mut editor = doc.edit();
        if stored.len() > permissions.len() {
            editor.clear();
            stored.clear();
        }
        for (key, value) in &permissions {
            if stored.get(key) != Some(value) {
                editor.put_bool(key, *value);
            }
        }
        editor.commit()?;
        Ok(permissions)
    }
}
