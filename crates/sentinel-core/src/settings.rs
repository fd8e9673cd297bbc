//! App state kept in the data namespace: the command trigger word and
//! the device lockdown flag.

use crate::error::{Result, StoreError};
use crate::store::{Store, NS_DATA};
use crate::validate::ensure_string_valid;

pub const KEY_COMMAND_TRIGGER: &str = "cmd-trigger";
pub const KEY_LOCKDOWN_STATUS: &str = "lockdown-status";

/// Trigger word reported when none has been saved.
pub const DEFAULT_TRIGGER_WORD: &str = "oat";

pub struct AppSettings<'a> {
    store: &'a Store,
}

impl<'a> AppSettings<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Saves a new command trigger word and returns it. The word must be
    /// non-blank and contain no whitespace; it replaces any previous
    /// word wholesale.
    pub fn save_command_trigger_word(&self, trigger: &str) -> Result<String> {
        ensure_string_valid(trigger, "command trigger")?;
        if trigger.chars().any(char::is_whitespace) {
            return Err(StoreError::invalid(
                "command trigger",
                "must not contain whitespace",
            ));
        }

        let doc = self.store.document(NS_DATA)?;
        let mut editor = doc.edit();
        editor.put_string(KEY_COMMAND_TRIGGER, trigger);
        editor.commit()?;
        Ok(trigger.to_string())
    }

    /// The current trigger word, or [`DEFAULT_TRIGGER_WORD`] when unset.
    pub fn command_trigger_word(&self) -> Result<String> {
        let doc = self.store.document(NS_DATA)?;
        Ok(doc
            .get_string(KEY_COMMAND_TRIGGER)
            .unwrap_or(DEFAULT_TRIGGER_WORD)
            .to_string())
    }

    pub fn set_lockdown_status(&self, enabled: bool) -> Result<()> {
        let doc = self.store.document(NS_DATA)?;
        let mut editor = doc.edit();
        editor.put_bool(KEY_LOCKDOWN_STATUS, enabled);
        editor.commit()
    }

    /// Whether the device is under lockdown; defaults to `false`.
    pub fn lockdown_status(&self) -> Result<bool> {
        let doc = self.store.document(NS_DATA)?;
        Ok(doc.get_bool(KEY_LOCKDOWN_STATUS, false))
    }
}
