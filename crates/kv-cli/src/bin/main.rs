//! kvctl - read and write values in the OS keychain
//!
//! Settings (keychain service, log filter) come from settings.json in the
//! platform config directory; `--service` and `--config-dir` override them.
//! Logs go to stderr so `kvctl get` output can be piped.

use clap::Parser;
use tracing::debug;

use kv_cli::{execute, Args};
use kv_store::SettingsManager;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let manager = match &args.config_dir {
        Some(dir) => SettingsManager::new(dir)?,
        None => SettingsManager::open_default()?,
    };
    let mut settings = manager.get().clone();

    // RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_filter)),
        )
        .init();

    if let Some(service) = args.service {
        settings.service = service;
    }
    debug!(
        settings = %manager.settings_file().display(),
        service = %settings.service,
        "Using keychain service"
    );

    let mut store = settings.keychain_store();
    execute(&mut store, &args.command, &mut std::io::stdout().lock())?;

    Ok(())
}
