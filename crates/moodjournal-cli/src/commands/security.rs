//! App lock commands for CLI.

use clap::Subcommand;
use moodjournal_core::timestamp;
use serde::Serialize;

use crate::context::{print_json, AppContext, CliResult};

#[derive(Subcommand)]
pub enum SecurityAction {
    /// Show lock settings and whether the journal is locked
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Set a PIN and turn the lock on
    EnablePin {
        #[arg(long)]
        pin: String,
        /// Minutes an unlock stays valid
        #[arg(long)]
        timeout: Option<u32>,
    },
    /// Turn PIN locking off
    DisablePin,
    /// Minutes an unlock stays valid; 0 asks on every command
    Timeout { minutes: u32 },
    /// Unlock the journal
    Unlock {
        #[arg(long)]
        pin: String,
    },
    /// Lock the journal now
    Lock,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    #[serde(flatten)]
    settings: moodjournal_core::SecuritySettings,
    has_pin: bool,
    state: moodjournal_core::LockState,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_unlock: Option<String>,
}

pub fn run(action: SecurityAction) -> CliResult {
    let ctx = AppContext::open()?;

    match action {
        SecurityAction::Status { json } => {
            let gate = ctx.gate();
            let store = gate.store();
            let status = Status {
                settings: store.settings(),
                has_pin: store.has_pin(),
                state: gate.state(),
                last_unlock: store
                    .last_unlock()
                    .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
                    .map(timestamp::to_iso),
            };
            if json {
                return print_json(&status);
            }
            println!(
                "Lock:     {}",
                if status.settings.is_enabled { "enabled" } else { "disabled" }
            );
            println!("PIN:      {}", if status.settings.use_pin { "on" } else { "off" });
            println!("Timeout:  {} min", status.settings.lock_timeout);
            println!("State:    {:?}", status.state);
            if let Some(at) = &status.last_unlock {
                println!("Unlocked: {at}");
            }
        }
        SecurityAction::EnablePin { pin, timeout } => {
            ctx.ensure_unlocked()?;
            let store = moodjournal_core::SecurityStore::new(&ctx.db);
            let mut settings = store.enable_pin(&pin)?;
            if let Some(minutes) = timeout {
                settings = store.set_lock_timeout(minutes)?;
            }
            // Setting the PIN counts as an unlock.
            store.record_unlock(chrono::Utc::now());
            println!("PIN lock enabled (timeout {} min)", settings.lock_timeout);
        }
        SecurityAction::DisablePin => {
            ctx.ensure_unlocked()?;
            let settings = moodjournal_core::SecurityStore::new(&ctx.db).disable_pin()?;
            if settings.is_enabled {
                println!("PIN lock disabled; biometric lock stays on");
            } else {
                println!("Lock disabled");
            }
        }
        SecurityAction::Timeout { minutes } => {
            ctx.ensure_unlocked()?;
            moodjournal_core::SecurityStore::new(&ctx.db).set_lock_timeout(minutes)?;
            println!("Lock timeout set to {minutes} min");
        }
        SecurityAction::Unlock { pin } => {
            let mut gate = ctx.gate();
            if !gate.unlock(Some(&pin)) {
                return Err("incorrect PIN".into());
            }
            println!("Unlocked");
        }
        SecurityAction::Lock => {
            let mut gate = ctx.gate();
            gate.lock();
            gate.store().clear_last_unlock()?;
            println!("Locked");
        }
    }
    Ok(())
}
