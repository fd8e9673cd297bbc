//! Command password lifecycle: creation, rotation, verification, and
//! corruption self-healing.
//!
//! The record is a salted SHA-256 digest: `digest(salt || password)`,
//! with a 16-byte random salt generated once per password lifetime and
//! reused across rotations. Hash and salt are stored base64-encoded and
//! must exist as a pair; a hash without a usable salt is treated as a
//! corrupted record and purged before the error is raised, so the next
//! call observes an empty credential namespace.

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::store::{Store, NS_DATA};
use crate::validate::ensure_string_valid;

pub const KEY_COMMAND_PASSWORD: &str = "password";
pub const KEY_COMMAND_PASSWORD_SALT: &str = "pwdsalt";
pub const SALT_LEN: usize = 16;

/// Owns the password keys inside the data namespace.
pub struct CredentialStore<'a> {
    store: &'a Store,
}

impl<'a> CredentialStore<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Saves a new command password.
    ///
    /// On first-time setup `old_password` is ignored. Once a password
    /// exists, rotation requires the current password; a mismatch raises
    /// [`StoreError::PasswordMismatch`] and leaves the record untouched.
    /// The salt is generated only when none is on record — rotation
    /// never re-salts.
    pub fn save_password(&self, password: &str, old_password: Option<&str>) -> Result<()> {
        ensure_string_valid(password, "new password")?;

        let doc = self.store.document(NS_DATA)?;
        let stored_salt = doc.get_string(KEY_COMMAND_PASSWORD_SALT).map(str::to_owned);
        let has_hash = doc.get_string(KEY_COMMAND_PASSWORD).is_some();

        let mut editor = doc.edit();
        let salt: Zeroizing<Vec<u8>> = match stored_salt {
            Some(encoded) => match general_purpose::STANDARD.decode(&encoded) {
                Ok(bytes) => Zeroizing::new(bytes),
                Err(_) => {
                    drop(editor);
                    self.purge()?;
                    return Err(StoreError::CorruptedCredential);
                }
            },
            None => {
                let mut bytes = Zeroizing::new(vec![0u8; SALT_LEN]);
                rand::rngs::OsRng.fill_bytes(bytes.as_mut_slice());
                editor.put_string(
                    KEY_COMMAND_PASSWORD_SALT,
                    &general_purpose::STANDARD.encode(&*bytes),
                );
                bytes
            }
        };

        if has_hash {
            let old = old_password.unwrap_or("");
            ensure_string_valid(old, "old password")?;
            if !self.verify_password(old)? {
                return Err(StoreError::PasswordMismatch);
            }
        }

        editor.put_string(KEY_COMMAND_PASSWORD, &salted_digest(&salt, password));
        editor.commit()
    }

    /// Verifies a candidate against the stored record.
    ///
    /// A blank candidate returns `false` rather than raising —
    /// verification treats a malformed candidate as "does not match".
    /// [`StoreError::NoPasswordSet`] is distinct from a failed check:
    /// there is nothing to check against. A hash stored without a
    /// usable salt is purged and reported as
    /// [`StoreError::CorruptedCredential`].
    pub fn verify_password(&self, candidate: &str) -> Result<bool> {
        if candidate.trim().is_empty() {
            return Ok(false);
        }

        let doc = self.store.document(NS_DATA)?;
        let stored_hash = match doc.get_string(KEY_COMMAND_PASSWORD) {
            Some(hash) => hash.to_owned(),
            None => return Err(StoreError::NoPasswordSet),
        };
        let salt: Zeroizing<Vec<u8>> = match doc
            .get_string(KEY_COMMAND_PASSWORD_SALT)
            .map(|s| general_purpose::STANDARD.decode(s))
        {
            Some(Ok(bytes)) => Zeroizing::new(bytes),
            Some(Err(_)) | None => {
                warn!("credential record corrupted, purging hash and salt");
                purge_credentials(doc)?;
                return Err(StoreError::CorruptedCredential);
            }
        };

        // Not constant-time; the threat model is local-only.
        Ok(salted_digest(&salt, candidate) == stored_hash)
    }

    /// True once a password record exists.
    pub fn has_password(&self) -> Result<bool> {
        let doc = self.store.document(NS_DATA)?;
        Ok(doc.get_string(KEY_COMMAND_PASSWORD).is_some())
    }

    fn purge(&self) -> Result<()> {
        warn!("credential record corrupted, purging hash and salt");
        purge_credentials(self.store.document(NS_DATA)?)
    }
}

fn purge_credentials(doc: Document) -> Result<()> {
    let mut editor = doc.edit();
    editor.remove(KEY_COMMAND_PASSWORD);
    editor.remove(KEY_COMMAND_PASSWORD_SALT);
    editor.commit()
}

/// `base64(SHA-256(salt || password_bytes))`.
fn salted_digest(salt: &[u8], password: &str) -> String {
    let mut material = Zeroizing::new(Vec::with_capacity(salt.len() + password.len()));
    material.extend_from_slice(salt);
    material.extend_from_slice(password.as_bytes());
    let digest = Sha256::digest(material.as_slice());
    general_purpose::STANDARD.encode(digest)
}
