use super::migration_manager;
use crate::db::db::Db;
use crate::db::migrations::get_db_version;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Compare the stored schema version with the known migrations
    Status,
    /// Show applied migrations
    History,
}

pub fn cmd(args: MigrationsArgs, store: &ConfigStore) -> Result<()> {
    let manager = migration_manager(store)?;
    let db = Db::new_without_migrations(store.database_path())?;
    let conn = db.conn()?;

    match args.command {
        MigrationsCommand::Status => {
            let version = get_db_version(conn)?;
            let latest = manager.latest_version();

            msg_print!(Message::DatabaseVersion(version));
            msg_print!(Message::LatestKnownVersion(latest));
            if version > latest {
                msg_warning!(Message::DatabaseAheadOfApp(version, latest));
            } else {
                match manager.pending(version).len() {
                    0 => msg_info!(Message::DatabaseUpToDate),
                    n => msg_info!(Message::DatabaseNeedsUpdate(n)),
                }
            }
        }
        MigrationsCommand::History => {
            let history = manager.get_migration_history(conn)?;
            if history.is_empty() {
                msg_info!(Message::NoMigrationHistory);
                return Ok(());
            }
            msg_print!(Message::MigrationHistory, true);
            View::migrations(&history);
        }
    }

    Ok(())
}
