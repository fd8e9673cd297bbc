//! Trusted contacts: phone number → display name.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::registry::NamespacedRegistry;
use crate::store::{Store, NS_TRUSTED_CONTACTS};
use crate::validate::{ensure_phone_number_valid, ensure_string_valid};

pub struct TrustedContacts<'a> {
    registry: NamespacedRegistry<'a, String>,
}

impl<'a> TrustedContacts<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            registry: NamespacedRegistry::new(store, NS_TRUSTED_CONTACTS, "phone number"),
        }
    }

    /// All trusted contacts, keyed by phone number.
    pub fn fetch_all(&self) -> Result<BTreeMap<String, String>> {
        self.registry.fetch_all()
    }

    /// The stored name for a phone number, if any.
    pub fn name_for(&self, phone_number: &str) -> Result<Option<String>> {
        self.registry.fetch_one(phone_number)
    }

    /// Saves a contact and returns its phone number. The number must be
    /// syntactically valid and the name non-blank.
    pub fn save(&self, phone_number: &str, name: &str) -> Result<String> {
        ensure_phone_number_valid(phone_number, "new trusted contact")?;
        ensure_string_valid(name, "trusted contact name")?;
        self.registry.save_one(phone_number, name.to_string())?;
        Ok(phone_number.to_string())
    }

    /// Deletes a contact if present; absent numbers are a no-op. Returns
    /// the phone number either way.
    pub fn remove(&self, phone_number: &str) -> Result<String> {
        ensure_string_valid(phone_number, "phone number")?;
        let doc = self.registry.document()?;
        if doc.get_string(phone_number).is_some() {
            let mut editor = doc.edit();
            editor.remove(phone_number);
            editor.commit()?;
        }
        Ok(phone_number.to_string())
    }
}
