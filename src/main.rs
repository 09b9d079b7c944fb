use tracing_subscriber::EnvFilter;
use wdiary::commands::Cli;
use wdiary::libs::config::{ConfigLoad, ConfigStore};
use wdiary::libs::messages::{macros::is_debug_mode, Message};
use wdiary::{msg_error, msg_info};

/// Structured logging is only installed in debug mode; otherwise messages
/// go straight to the console.
fn init_tracing() {
    if !is_debug_mode() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wdiary=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let (mut store, load) = ConfigStore::open().map_err(|e| {
        msg_error!(Message::ConfigParseError(format!("{:#}", e)));
        e
    })?;

    match load {
        ConfigLoad::Created => msg_info!(Message::ConfigCreated(store.path().display().to_string())),
        ConfigLoad::Migrated { from, to } => msg_info!(Message::ConfigMigrated(from, to)),
        ConfigLoad::Loaded => {}
    }

    Cli::menu(&mut store).await
}
