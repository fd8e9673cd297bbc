//! Permissions to re-request at next app launch.
//!
//! A feature can be enabled while the OS permission it needs was
//! revoked; the permission name is queued here and cleared once granted.
//! The queue is a set: membership is idempotent and a call that would
//! not change membership performs no write.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::store::{Store, NS_DATA};
use crate::validate::ensure_string_valid;

pub const KEY_MISSING_PERMISSIONS: &str = "missing-permission";

pub struct StartupPermissionQueue<'a> {
    store: &'a Store,
}

impl<'a> StartupPermissionQueue<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Queues a permission for re-request. Returns the permission name.
    pub fn add(&self, permission: &str) -> Result<String> {
        ensure_string_valid(permission, "missing permission")?;
        let doc = self.store.document(NS_DATA)?;
        let mut queued = doc.get_string_set(KEY_MISSING_PERMISSIONS);
        if queued.insert(permission.to_string()) {
            let mut editor = doc.edit();
            editor.put_string_set(KEY_MISSING_PERMISSIONS, queued);
            editor.commit()?;
        }
        Ok(permission.to_string())
    }

    /// Drops a permission from the queue. Returns the permission name
    /// whether or not it was queued.
    pub fn remove(&self, permission: &str) -> Result<String> {
        ensure_string_valid(permission, "missing permission to be removed")?;
        let doc = self.store.document(NS_DATA)?;
        let mut queued = doc.get_string_set(KEY_MISSING_PERMISSIONS);
        if queued.remove(permission) {
            let mut editor = doc.edit();
            editor.put_string_set(KEY_MISSING_PERMISSIONS, queued);
            editor.commit()?;
        }
        Ok(permission.to_string())
    }

    /// The current queue; empty if nothing is pending.
    pub fn fetch_all(&self) -> Result<BTreeSet<String>> {
        let doc = self.store.document(NS_DATA)?;
        Ok(doc.get_string_set(KEY_MISSING_PERMISSIONS))
    }
}
