//! Generic typed access to one namespace.
//!
//! Every namespace follows the same get/put pattern; this module holds
//! it once, parameterized by value type. Domain wrappers instantiate a
//! registry per namespace and expose only the operations that namespace
//! is granted.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::document::{Document, Value};
use crate::error::Result;
use crate::store::Store;
use crate::validate::ensure_string_valid;

/// A primitive value a registry can hold.
pub trait RegistryValue: Sized + Clone {
    fn from_value(value: &Value) -> Option<Self>;
    fn to_value(&self) -> Value;
}

impl RegistryValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl RegistryValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

/// Typed view over one namespace.
pub struct NamespacedRegistry<'a, V> {
    store: &'a Store,
    namespace: &'static str,
    key_label: &'static str,
    _value: PhantomData<V>,
}

impl<'a, V: RegistryValue> NamespacedRegistry<'a, V> {
    pub(crate) fn new(store: &'a Store, namespace: &'static str, key_label: &'static str) -> Self {
        Self {
            store,
            namespace,
            key_label,
            _value: PhantomData,
        }
    }

    pub(crate) fn document(&self) -> Result<Document> {
        self.store.document(self.namespace)
    }

    /// The full current mapping; empty if the namespace was never written.
    pub fn fetch_all(&self) -> Result<BTreeMap<String, V>> {
        let doc = self.document()?;
        Ok(doc
            .all()
            .iter()
            .filter_map(|(key, value)| V::from_value(value).map(|v| (key.clone(), v)))
            .collect())
    }

    /// Writes one entry and returns the written value.
    pub fn save_one(&self, key: &str, value: V) -> Result<V> {
        ensure_string_valid(key, self.key_label)?;
        let doc = self.document()?;
        let mut editor = doc.edit();
        editor.put_value(key, value.to_value());
        editor.commit()?;
        Ok(value)
    }

    pub(crate) fn ensure_key(&self, key: &str) -> Result<()> {
        ensure_string_valid(key, self.key_label)
    }
}

impl<'a> NamespacedRegistry<'a, bool> {
    /// One entry; absent keys read as `false` — "not found" and "found
    /// but false" are indistinguishable by design.
    pub fn fetch_one(&self, key: &str) -> Result<bool> {
        self.ensure_key(key)?;
        Ok(self.document()?.get_bool(key, false))
    }
}

impl<'a> NamespacedRegistry<'a, String> {
    /// One entry, or `None` if absent.
    pub fn fetch_one(&self, key: &str) -> Result<Option<String>> {
        self.ensure_key(key)?;
        Ok(self.document()?.get_string(key).map(str::to_owned))
    }
}
