use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use sentinel_core::Store;

#[derive(Parser)]
#[command(name = "sentinel-cli")]
#[command(about = "Inspect and mutate the Sentinel preference store", long_about = None)]
struct Cli {
    /// Override the store directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every namespace
    Status,

    /// Set or rotate the command password (prompts on the terminal)
    SetPassword,

    /// Check a candidate password (prompts on the terminal)
    VerifyPassword,

    /// Show the command trigger word
    GetTrigger,

    /// Set the command trigger word
    SetTrigger {
        /// New trigger word (no whitespace)
        word: String,
    },

    /// Show the lockdown flag
    GetLockdown,

    /// Set the lockdown flag
    SetLockdown {
        /// true to enable lockdown
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Add or update a trusted contact
    AddContact {
        /// Phone number, digits with optional leading +
        number: String,
        /// Contact name
        name: String,
    },

    /// Remove a trusted contact
    RemoveContact {
        /// Phone number of the contact
        number: String,
    },

    /// List trusted contacts
    ListContacts,

    /// Record a single permission state
    SetPermission {
        key: String,
        #[arg(action = clap::ArgAction::Set)]
        granted: bool,
    },

    /// Bulk-replace the permission map from a JSON object
    SyncPermissions {
        /// e.g. '{"android.permission.SEND_SMS": true}'
        json: String,
    },

    /// List recorded permissions
    ListPermissions,

    /// Enable or disable a feature
    SetFeature {
        key: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// List feature flags
    ListFeatures,

    /// Record acceptance of a condition
    AcceptCondition {
        key: String,
    },

    /// List accepted conditions
    ListConditions,

    /// Queue a permission for re-request at next launch
    QueueAdd {
        permission: String,
    },

    /// Drop a permission from the startup queue
    QueueRemove {
        permission: String,
    },

    /// List the startup permission-request queue
    QueueList,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let store = match cli.data_dir {
        Some(dir) => Store::open(dir)?,
        None => Store::open_default()?,
    };

    match cli.command {
        Commands::Status => status(&store),
        Commands::SetPassword => set_password(&store),
        Commands::VerifyPassword => verify_password(&store),
        Commands::GetTrigger => {
            println!("{}", store.settings().command_trigger_word()?);
            Ok(())
        }
        Commands::SetTrigger { word } => {
            let saved = store.settings().save_command_trigger_word(&word)?;
            println!("trigger word set to {saved:?}");
            Ok(())
        }
        Commands::GetLockdown => {
            println!("{}", store.settings().lockdown_status()?);
            Ok(())
        }
        Commands::SetLockdown { enabled } => {
            store.settings().set_lockdown_status(enabled)?;
            println!("lockdown {}", if enabled { "enabled" } else { "disabled" });
            Ok(())
        }
        Commands::AddContact { number, name } => {
            let saved = store.trusted_contacts().save(&number, &name)?;
            println!("saved contact {saved}");
            Ok(())
        }
        Commands::RemoveContact { number } => {
            let removed = store.trusted_contacts().remove(&number)?;
            println!("removed contact {removed}");
            Ok(())
        }
        Commands::ListContacts => print_json(&store.trusted_contacts().fetch_all()?),
        Commands::SetPermission { key, granted } => {
            store.permissions().save(&key, granted)?;
            println!("{key} = {granted}");
            Ok(())
        }
        Commands::SyncPermissions { json } => {
            let incoming: BTreeMap<String, bool> =
                serde_json::from_str(&json).map_err(|e| anyhow!("parse permission map: {e}"))?;
            let saved = store.permissions().save_all(incoming)?;
            println!("synced {} permissions", saved.len());
            Ok(())
        }
        Commands::ListPermissions => print_json(&store.permissions().fetch_all()?),
        Commands::SetFeature { key, enabled } => {
            store.features().save(&key, enabled)?;
            println!("{key} = {enabled}");
            Ok(())
        }
        Commands::ListFeatures => print_json(&store.features().fetch_all()?),
        Commands::AcceptCondition { key } => {
            store.conditions().save(&key, true)?;
            println!("accepted {key}");
            Ok(())
        }
        Commands::ListConditions => print_json(&store.conditions().fetch_all()?),
        Commands::QueueAdd { permission } => {
            let added = store.startup_requests().add(&permission)?;
            println!("queued {added}");
            Ok(())
        }
        Commands::QueueRemove { permission } => {
            let removed = store.startup_requests().remove(&permission)?;
            println!("dropped {removed}");
            Ok(())
        }
        Commands::QueueList => {
            for permission in store.startup_requests().fetch_all()? {
                println!("{permission}");
            }
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status(store: &Store) -> Result<()> {
    let settings = store.settings();
    let summary = serde_json::json!({
        "root": store.root().display().to_string(),
        "passwordSet": store.credentials().has_password()?,
        "triggerWord": settings.command_trigger_word()?,
        "lockdown": settings.lockdown_status()?,
        "trustedContacts": store.trusted_contacts().fetch_all()?.len(),
        "permissions": store.permissions().fetch_all()?.len(),
        "features": store.features().fetch_all()?,
        "conditions": store.conditions().fetch_all()?,
        "startupQueue": store.startup_requests().fetch_all()?,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn set_password(store: &Store) -> Result<()> {
    let creds = store.credentials();
    let old = if creds.has_password()? {
        Some(prompt_password_once("Current password: ")?)
    } else {
        None
    };
    let password = prompt_password_twice("New password")?;
    creds.save_password(&password, old.as_deref())?;
    println!("password updated");
    Ok(())
}

fn verify_password(store: &Store) -> Result<()> {
    let candidate = prompt_password_once("Password: ")?;
    if store.credentials().verify_password(&candidate)? {
        println!("password matches");
    } else {
        println!("password does not match");
    }
    Ok(())
}

fn prompt_password_once(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).map_err(|e| anyhow!("password prompt: {e}"))
}

fn prompt_password_twice(prompt: &str) -> Result<String> {
    let first = prompt_password_once(&format!("{prompt}: "))?;
    let second = prompt_password_once(&format!("{prompt} (repeat): "))?;
    if first != second {
        return Err(anyhow!("passwords do not match"));
    }
    Ok(first)
}
