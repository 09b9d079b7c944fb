//! Command-line interface.
//!
//! Each subcommand lives in its own module exposing an `Args` struct and a
//! `cmd` function. The configuration is loaded once in `main` and handed to
//! [`Cli::menu`]; commands that touch the database open it through
//! [`open_db`], which applies pending migrations first.

pub mod add;
pub mod backup;
pub mod delete;
pub mod departments;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod migrations;
pub mod report;
pub mod show;
pub mod tasks;

use crate::db::db::Db;
use crate::db::migrations::MigrationManager;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::msg_error;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create the configuration and database")]
    Init,
    #[command(about = "Add a work record")]
    Add(add::AddArgs),
    #[command(about = "Edit a work record")]
    Edit(edit::EditArgs),
    #[command(about = "Delete a work record")]
    Delete(delete::DeleteArgs),
    #[command(about = "Show a single work record")]
    Show(show::ShowArgs),
    #[command(about = "List recent work records")]
    List(list::ListArgs),
    #[command(about = "List known departments")]
    Departments,
    #[command(about = "Show records for a date range")]
    Report(report::ReportArgs),
    #[command(about = "Export records for a date range to a file")]
    Export(export::ExportArgs),
    #[command(about = "Create, restore and prune database backups")]
    Backup(backup::BackupArgs),
    #[command(about = "Inspect the database schema version")]
    Migrations(migrations::MigrationsArgs),
    #[command(about = "Manage the list of main tasks")]
    Tasks(tasks::TasksArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu(store: &mut ConfigStore) -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init => init::cmd(store),
            Commands::Add(args) => add::cmd(args, store),
            Commands::Edit(args) => edit::cmd(args, store),
            Commands::Delete(args) => delete::cmd(args, store),
            Commands::Show(args) => show::cmd(args, store),
            Commands::List(args) => list::cmd(args, store),
            Commands::Departments => departments::cmd(store),
            Commands::Report(args) => report::cmd(args, store),
            Commands::Export(args) => export::cmd(args, store).await,
            Commands::Backup(args) => backup::cmd(args, store),
            Commands::Migrations(args) => migrations::cmd(args, store),
            Commands::Tasks(args) => tasks::cmd(args, store),
        }
    }
}

/// Builds the migration set for `store`: the built-in steps plus any
/// scripts in the configured migrations directory.
pub fn migration_manager(store: &ConfigStore) -> Result<MigrationManager> {
    Ok(match store.migrations_dir() {
        Some(dir) => MigrationManager::with_scripts_dir(&dir)?,
        None => MigrationManager::new(),
    })
}

/// Opens the configured database and brings its schema up to date.
///
/// Failure here is fatal for every command that needs the database.
pub fn open_db(store: &ConfigStore) -> Result<Db> {
    let manager = migration_manager(store)?;
    Db::open_with(store.database_path(), &manager).map_err(|e| {
        msg_error!(Message::DatabaseOpenFailed(e.to_string()));
        e.into()
    })
}
