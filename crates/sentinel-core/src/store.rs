//! The store handle.
//!
//! One [`Store`] is constructed at process start and threaded through
//! call sites; it is never a process-wide singleton. Each functional
//! area is reached through an accessor so call sites never deal in raw
//! namespace names.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::conditions::AcceptedConditions;
use crate::contacts::TrustedContacts;
use crate::credential::CredentialStore;
use crate::document::{cleanup_staging_dir, Document};
use crate::error::Result;
use crate::features::FeatureFlags;
use crate::paths;
use crate::permissions::Permissions;
use crate::settings::AppSettings;
use crate::startup::StartupPermissionQueue;
use crate::validate::ensure_string_valid;

// Namespace identifiers. Each is an isolated key-value partition; keys
// in one namespace have no relation to keys in another.
pub const NS_DATA: &str = "sentinel-data";
pub const NS_TRUSTED_CONTACTS: &str = "sentinel-trusted-contacts";
pub const NS_PERMISSIONS: &str = "sentinel-permissions";
pub const NS_ENABLED_FEATURES: &str = "sentinel-enabled-features";
pub const NS_ACCEPTED_CONDITIONS: &str = "sentinel-accepted-conditions";

/// Handle to the on-disk preference store.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    commit_lock: Arc<Mutex<()>>,
}

impl Store {
    /// Opens (creating if necessary) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        restrict_dir_permissions(&root);
        cleanup_staging_dir(&root);
        Ok(Self {
            root,
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Opens the store at the platform default location.
    pub fn open_default() -> Result<Self> {
        Self::open(paths::data_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads a snapshot of one namespace.
    pub fn document(&self, namespace: &str) -> Result<Document> {
        ensure_string_valid(namespace, "namespace")?;
        Document::load(&self.root, namespace, Arc::clone(&self.commit_lock))
    }

    // ── Functional areas ────────────────────────────────────────────────

    pub fn credentials(&self) -> CredentialStore<'_> {
        CredentialStore::new(self)
    }

    pub fn settings(&self) -> AppSettings<'_> {
        AppSettings::new(self)
    }

    pub fn trusted_contacts(&self) -> TrustedContacts<'_> {
        TrustedContacts::new(self)
    }

    pub fn permissions(&self) -> Permissions<'_> {
        Permissions::new(self)
    }

    pub fn features(&self) -> FeatureFlags<'_> {
        FeatureFlags::new(self)
    }

    pub fn conditions(&self) -> AcceptedConditions<'_> {
        AcceptedConditions::new(self)
    }

    pub fn startup_requests(&self) -> StartupPermissionQueue<'_> {
        StartupPermissionQueue::new(self)
    }
}

fn restrict_dir_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o700)) {
            tracing::warn!("cannot restrict permissions on {}: {}", path.display(), e);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
