//! Integration tests for the preference store.
//!
//! Tests cover:
//!  1. Password creation, verification, rotation
//!  2. Corruption detection and self-healing purge
//!  3. Trigger word default and validation
//!  4. Lockdown flag
//!  5. Trusted contacts
//!  6. Permission map bulk replace (shrink semantics)
//!  7. Feature and condition flags
//!  8. Startup permission-request queue idempotence

use std::collections::BTreeMap;

use sentinel_core::credential::{KEY_COMMAND_PASSWORD, KEY_COMMAND_PASSWORD_SALT};
use sentinel_core::store::NS_DATA;
use sentinel_core::{Store, StoreError};
use tempfile::tempdir;

fn open_store(dir: &tempfile::TempDir) -> Store {
    Store::open(dir.path()).unwrap()
}

// ─── Password lifecycle ─────────────────────────────────────────────────────

#[test]
fn first_save_then_verify() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let creds = store.credentials();

    creds.save_password("NewPassword", None).unwrap();
    assert!(creds.verify_password("NewPassword").unwrap());
    assert!(!creds.verify_password("SomethingElse").unwrap());
}

#[test]
fn blank_password_rejected_before_storage() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let creds = store.credentials();

    assert!(matches!(
        creds.save_password("", None),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        creds.save_password("\n\r", None),
        Err(StoreError::InvalidArgument(_))
    ));
    // Nothing may have been written.
    let doc = store.document(NS_DATA).unwrap();
    assert!(doc.all().is_empty());
}

#[test]
fn blank_candidate_verifies_false_not_error() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let creds = store.credentials();
    creds.save_password("Password", None).unwrap();

    assert!(!creds.verify_password("").unwrap());
    assert!(!creds.verify_password("   ").unwrap());
}

#[test]
fn verify_without_password_is_distinct_from_mismatch() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);

    assert!(matches!(
        store.credentials().verify_password("anything"),
        Err(StoreError::NoPasswordSet)
    ));
}

#[test]
fn rotation_requires_the_current_password() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let creds = store.credentials();

    creds.save_password("A", None).unwrap();
    creds.save_password("B", Some("A")).unwrap();
    assert!(creds.verify_password("B").unwrap());
    assert!(!creds.verify_password("A").unwrap());

    // Wrong old password: rejected, record untouched.
    assert!(matches!(
        creds.save_password("C", Some("wrong")),
        Err(StoreError::PasswordMismatch)
    ));
    assert!(creds.verify_password("B").unwrap());

    // Missing old password counts as invalid input once a record exists.
    assert!(matches!(
        creds.save_password("C", None),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(creds.verify_password("B").unwrap());
}

// ─── Corruption self-healing ────────────────────────────────────────────────

#[test]
fn hash_without_salt_is_purged() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let creds = store.credentials();
    creds.save_password("A", None).unwrap();

    // Damage the record: drop only the salt.
    let doc = store.document(NS_DATA).unwrap();
    let mut editor = doc.edit();
    editor.remove(KEY_COMMAND_PASSWORD_SALT);
    editor.commit().unwrap();

    assert!(matches!(
        creds.verify_password("A"),
        Err(StoreError::CorruptedCredential)
    ));

    // Self-healing: both keys are gone afterwards.
    let doc = store.document(NS_DATA).unwrap();
    assert!(doc.get_string(KEY_COMMAND_PASSWORD).is_none());
    assert!(doc.get_string(KEY_COMMAND_PASSWORD_SALT).is_none());

    // The next save behaves as first-time setup.
    creds.save_password("Fresh", None).unwrap();
    assert!(creds.verify_password("Fresh").unwrap());
}

#[test]
fn undecodable_salt_is_purged() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let creds = store.credentials();
    creds.save_password("A", None).unwrap();

    let doc = store.document(NS_DATA).unwrap();
    let mut editor = doc.edit();
    editor.put_string(KEY_COMMAND_PASSWORD_SALT, "*** not base64 ***");
    editor.commit().unwrap();

    assert!(matches!(
        creds.verify_password("A"),
        Err(StoreError::CorruptedCredential)
    ));
    let doc = store.document(NS_DATA).unwrap();
    assert!(doc.get_string(KEY_COMMAND_PASSWORD).is_none());
}

// ─── Trigger word ───────────────────────────────────────────────────────────

#[test]
fn trigger_word_defaults_to_oat() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    assert_eq!(store.settings().command_trigger_word().unwrap(), "oat");
}

#[test]
fn trigger_word_save_and_fetch() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let settings = store.settings();

    assert_eq!(settings.save_command_trigger_word("lock").unwrap(), "lock");
    assert_eq!(settings.command_trigger_word().unwrap(), "lock");
}

#[test]
fn trigger_word_rejects_whitespace() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let settings = store.settings();

    assert!(matches!(
        settings.save_command_trigger_word("has space"),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        settings.save_command_trigger_word("tab\tword"),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        settings.save_command_trigger_word(""),
        Err(StoreError::InvalidArgument(_))
    ));
    assert_eq!(settings.command_trigger_word().unwrap(), "oat");
}

// ─── Lockdown flag ──────────────────────────────────────────────────────────

#[test]
fn lockdown_defaults_false_and_persists() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let settings = store.settings();

    assert!(!settings.lockdown_status().unwrap());
    settings.set_lockdown_status(true).unwrap();
    assert!(settings.lockdown_status().unwrap());

    // Survives a fresh handle.
    let store = open_store(&dir);
    assert!(store.settings().lockdown_status().unwrap());
}

// ─── Trusted contacts ───────────────────────────────────────────────────────

#[test]
fn contacts_save_fetch_remove() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let contacts = store.trusted_contacts();

    assert_eq!(contacts.save("+4366412345678", "Alex").unwrap(), "+4366412345678");
    contacts.save("06761234567", "Sam").unwrap();

    let all = contacts.fetch_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("+4366412345678").map(String::as_str), Some("Alex"));
    assert_eq!(
        contacts.name_for("06761234567").unwrap().as_deref(),
        Some("Sam")
    );

    assert_eq!(contacts.remove("06761234567").unwrap(), "06761234567");
    assert_eq!(contacts.fetch_all().unwrap().len(), 1);

    // Removing an absent number is a no-op, not an error.
    assert_eq!(contacts.remove("06761234567").unwrap(), "06761234567");
}

#[test]
fn contacts_reject_malformed_numbers() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let contacts = store.trusted_contacts();

    assert!(matches!(
        contacts.save("not-a-number", "Alex"),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        contacts.save("0664 1234567", "Alex"),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        contacts.save("+4366412345678", "  "),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(contacts.fetch_all().unwrap().is_empty());
}

// ─── Permissions ────────────────────────────────────────────────────────────

#[test]
fn permission_defaults_and_save() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let permissions = store.permissions();

    assert!(!permissions.is_granted("android.permission.SEND_SMS").unwrap());
    permissions.save("android.permission.SEND_SMS", true).unwrap();
    assert!(permissions.is_granted("android.permission.SEND_SMS").unwrap());
}

#[test]
fn save_all_shrink_clears_stale_keys() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let permissions = store.permissions();

    let initial: BTreeMap<String, bool> = [
        ("a".to_string(), true),
        ("b".to_string(), true),
        ("c".to_string(), true),
    ]
    .into_iter()
    .collect();
    permissions.save_all(initial).unwrap();
    assert_eq!(permissions.fetch_all().unwrap().len(), 3);

    let shrunk: BTreeMap<String, bool> = [("a".to_string(), true)].into_iter().collect();
    let returned = permissions.save_all(shrunk.clone()).unwrap();
    assert_eq!(returned, shrunk);

    // Clear-then-rewrite: exactly {a: true} remains.
    let stored = permissions.fetch_all().unwrap();
    assert_eq!(stored, shrunk);
}

#[test]
fn save_all_same_size_updates_in_place() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let permissions = store.permissions();

    let first: BTreeMap<String, bool> =
        [("a".to_string(), true), ("b".to_string(), false)].into_iter().collect();
    permissions.save_all(first).unwrap();

    let second: BTreeMap<String, bool> =
        [("a".to_string(), false), ("b".to_string(), true)].into_iter().collect();
    permissions.save_all(second.clone()).unwrap();
    assert_eq!(permissions.fetch_all().unwrap(), second);
}

// ─── Features and conditions ────────────────────────────────────────────────

#[test]
fn feature_flags_roundtrip() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let features = store.features();

    assert!(!features.is_enabled("photo-trap").unwrap());
    assert!(features.save("photo-trap", true).unwrap());
    assert!(features.is_enabled("photo-trap").unwrap());
    assert!(!features.save("photo-trap", false).unwrap());
    assert!(!features.is_enabled("photo-trap").unwrap());
}

#[test]
fn condition_flags_roundtrip() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let conditions = store.conditions();

    assert!(!conditions.is_accepted("terms-of-use").unwrap());
    conditions.save("terms-of-use", true).unwrap();
    assert!(conditions.is_accepted("terms-of-use").unwrap());

    assert!(matches!(
        conditions.save("", true),
        Err(StoreError::InvalidArgument(_))
    ));
}

// ─── Startup permission-request queue ───────────────────────────────────────

#[test]
fn queue_add_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let queue = store.startup_requests();

    queue.add("android.permission.SEND_SMS").unwrap();
    queue.add("android.permission.SEND_SMS").unwrap();

    let all = queue.fetch_all().unwrap();
    assert_eq!(all.len(), 1);
    assert!(all.contains("android.permission.SEND_SMS"));
}

#[test]
fn queue_remove_absent_is_noop() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let queue = store.startup_requests();

    assert_eq!(
        queue.remove("android.permission.CAMERA").unwrap(),
        "android.permission.CAMERA"
    );
    assert!(queue.fetch_all().unwrap().is_empty());

    queue.add("android.permission.CAMERA").unwrap();
    queue.add("android.permission.SEND_SMS").unwrap();
    queue.remove("android.permission.CAMERA").unwrap();

    let all = queue.fetch_all().unwrap();
    assert_eq!(all.len(), 1);
    assert!(all.contains("android.permission.SEND_SMS"));
}

#[test]
fn queue_rejects_blank_names() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    let queue = store.startup_requests();

    assert!(matches!(queue.add("  "), Err(StoreError::InvalidArgument(_))));
    assert!(matches!(queue.remove(""), Err(StoreError::InvalidArgument(_))));
}
