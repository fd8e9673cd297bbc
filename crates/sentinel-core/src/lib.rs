//! Local preference and credential store for the Sentinel
//! device-protection application.
//!
//! All data stays on the device, split across isolated namespaces:
//! command password (salted hash), command trigger word, lockdown flag,
//! trusted contacts, runtime permissions, feature flags, accepted
//! conditions, and the startup permission-request queue. A [`Store`]
//! handle is constructed once at process start and threaded through
//! call sites; every public operation is one synchronous
//! read-modify-write cycle committed before return.

pub mod conditions;
pub mod contacts;
pub mod credential;
pub mod document;
pub mod error;
pub mod features;
pub mod paths;
pub mod permissions;
pub mod registry;
pub mod settings;
pub mod startup;
pub mod store;
pub mod validate;

pub use conditions::AcceptedConditions;
pub use contacts::TrustedContacts;
pub use credential::CredentialStore;
pub use document::{Document, Editor, Value};
pub use error::{Result, StoreError};
pub use features::FeatureFlags;
pub use permissions::Permissions;
pub use registry::NamespacedRegistry;
pub use settings::AppSettings;
pub use startup::StartupPermissionQueue;
pub use store::Store;
