//! Durable key-value documents, one per namespace.
//!
//! A [`Document`] is a point-in-time snapshot of one namespace file.
//! Reads come from the snapshot; mutations go through an [`Editor`] that
//! stages edits and commits them in a single atomic file replacement.
//! Uncommitted editors are simply dropped and leave no trace on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Result, StoreError};

pub const DOCUMENT_VERSION: u32 = 1;

/// A single stored value. Namespaces hold booleans, strings, or string
/// sets; nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    TextSet(BTreeSet<String>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Value::TextSet(s) => Some(s),
            _ => None,
        }
    }
}

/// On-disk envelope for one namespace.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    version: u32,
    updated_at: DateTime<Utc>,
    checksum: String,
    entries: BTreeMap<String, Value>,
}

/// Snapshot of one namespace.
#[derive(Debug)]
pub struct Document {
    name: String,
    path: PathBuf,
    entries: BTreeMap<String, Value>,
    commit_lock: Arc<Mutex<()>>,
}

impl Document {
    /// Loads the namespace file, or an empty snapshot if it was never
    /// written. Envelope damage is reported, never silently repaired.
    pub(crate) fn load(root: &Path, name: &str, commit_lock: Arc<Mutex<()>>) -> Result<Self> {
        let path = root.join(format!("{name}.json"));
        let entries = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let file: DocumentFile = serde_json::from_str(&json).map_err(|e| {
                warn!(namespace = %name, error = %e, "document envelope unreadable");
                StoreError::DocumentCorrupted {
                    namespace: name.to_string(),
                }
            })?;
            if file.version != DOCUMENT_VERSION {
                warn!(namespace = %name, version = file.version, "unsupported document version");
                return Err(StoreError::DocumentCorrupted {
                    namespace: name.to_string(),
                });
            }
            if file.checksum != entries_checksum(&file.entries)? {
                warn!(namespace = %name, "document checksum mismatch");
                return Err(StoreError::DocumentCorrupted {
                    namespace: name.to_string(),
                });
            }
            file.entries
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            name: name.to_string(),
            path,
            entries,
            commit_lock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_text)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.entries
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Returns the stored string set, or an empty set if unset.
    pub fn get_string_set(&self, key: &str) -> BTreeSet<String> {
        self.entries
            .get(key)
            .and_then(Value::as_text_set)
            .cloned()
            .unwrap_or_default()
    }

    pub fn all(&self) -> &BTreeMap<String, Value> {
        &self.entries
    }

    /// Opens a scoped editor over this snapshot.
    pub fn edit(self) -> Editor {
        Editor {
            doc: self,
            ops: Vec::new(),
        }
    }
}

#[derive(Debug)]
enum EditOp {
    Put(String, Value),
    Remove(String),
    Clear,
}

/// Staged edits against one document. Edits become durable only on
/// [`Editor::commit`]; a dropped editor discards them.
#[derive(Debug)]
pub struct Editor {
    doc: Document,
    ops: Vec<EditOp>,
}

impl Editor {
    pub fn put_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.put_value(key, Value::Text(value.to_string()))
    }

    pub fn put_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.put_value(key, Value::Bool(value))
    }

    pub fn put_string_set(&mut self, key: &str, value: BTreeSet<String>) -> &mut Self {
        self.put_value(key, Value::TextSet(value))
    }

    pub fn put_value(&mut self, key: &str, value: Value) -> &mut Self {
        self.ops.push(EditOp::Put(key.to_string(), value));
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.ops.push(EditOp::Remove(key.to_string()));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.ops.push(EditOp::Clear);
        self
    }

    /// Applies the staged edits and durably replaces the namespace file.
    /// A commit with no staged edits is a no-op and touches nothing.
    pub fn commit(self) -> Result<()> {
        if self.ops.is_empty() {
            return Ok(());
        }
        let Editor { mut doc, ops } = self;
        for op in ops {
            match op {
                EditOp::Put(key, value) => {
                    doc.entries.insert(key, value);
                }
                EditOp::Remove(key) => {
                    doc.entries.remove(&key);
                }
                EditOp::Clear => doc.entries.clear(),
            }
        }

        let file = DocumentFile {
            version: DOCUMENT_VERSION,
            updated_at: Utc::now(),
            checksum: entries_checksum(&doc.entries)?,
            entries: doc.entries,
        };
        let json = serde_json::to_string_pretty(&file)?;

        let _guard = doc.commit_lock.lock();
        write_atomic(&doc.path, json.as_bytes())?;
        debug!(namespace = %doc.name, "document committed");
        Ok(())
    }
}

/// Checksum over the canonical serialization of the entry map. The map
/// is ordered, so the serialization is deterministic.
fn entries_checksum(entries: &BTreeMap<String, Value>) -> Result<String> {
    let canonical = serde_json::to_vec(entries)?;
    Ok(blake3::hash(&canonical).to_hex().to_string())
}

/// Replace `dest` via a staged sibling file so readers never observe a
/// torn write, even across a crash.
fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| StoreError::invalid("document path", "has no parent directory"))?;
    let staging = parent.join(format!(".{}.staging", Uuid::new_v4()));
    {
        let mut file = File::create(&staging)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&staging, dest)?;
    fsync_dir(parent)?;
    Ok(())
}

/// Remove any leftover `.staging` files from a previous crash.
pub(crate) fn cleanup_staging_dir(root: &Path) {
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(".staging") {
                warn!(path = %entry.path().display(), "removing orphaned staging file");
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

fn fsync_dir(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let dir = OpenOptions::new().read(true).open(path)?;
        dir.sync_all()?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
