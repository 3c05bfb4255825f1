//! kvctl - command-line access to a key-value store
//!
//! Argument parsing and command execution live here so they can be tested
//! against an in-memory store; the binary only wires up logging, settings
//! and the keychain.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kv_store::{KeyValueStore, StoreError};
use tracing::info;

/// kvctl - read and write values in the OS keychain
#[derive(Parser, Debug)]
#[command(name = "kvctl")]
#[command(version)]
#[command(about = "Read and write key-value pairs in the OS keychain")]
pub struct Args {
    /// Keychain service to use (overrides the settings file)
    #[arg(long, env = "KVCTL_SERVICE")]
    pub service: Option<String>,

    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long, env = "KVCTL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store VALUE under KEY, replacing any previous value
    Set { key: String, value: String },
    /// Print the value stored under KEY
    Get { key: String },
    /// Remove the value stored under KEY
    Delete { key: String },
    /// Remove every value in the service
    Clear,
}

/// CLI error types
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Run `command` against `store`, writing any value read to `out`
pub fn execute<S, W>(store: &mut S, command: &Command, out: &mut W) -> Result<(), CliError>
where
    S: KeyValueStore + ?Sized,
    W: Write,
{
    match command {
        Command::Set { key, value } => {
            store.set_value(key, value.as_bytes())?;
            info!("Stored value for {}", key);
        }
        Command::Get { key } => {
            let value = store.get_value(key)?;
            out.write_all(&value)?;
            out.flush()?;
        }
        Command::Delete { key } => {
            store.delete_value(key)?;
            info!("Deleted value for {}", key);
        }
        Command::Clear => {
            store.delete_all_values()?;
            info!("Deleted all values");
        }
    }

    Ok(())
}
