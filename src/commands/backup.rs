use super::open_db;
use crate::libs::backup::BackupManager;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    command: BackupCommand,
}

#[derive(Debug, Subcommand)]
enum BackupCommand {
    /// Copy the database into the backup directory or to `--dest`
    Create {
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },
    /// Replace the database with a backup file
    Restore {
        file: PathBuf,
        #[arg(short, long)]
        yes: bool,
    },
    /// List backups, newest first
    List,
    /// Delete all but the newest backups
    Cleanup {
        /// How many to keep, defaults to `backup_retention`
        #[arg(short, long)]
        retain: Option<usize>,
    },
}

pub fn cmd(args: BackupArgs, store: &ConfigStore) -> Result<()> {
    let manager = BackupManager::new(store.backup_dir());

    match args.command {
        BackupCommand::Create { dest } => {
            let mut db = open_db(store)?;
            let created = match dest {
                Some(dest) => manager.backup(&mut db, &dest),
                None => manager.backup_to_dir(&mut db),
            };
            match created {
                Ok(path) => msg_success!(Message::BackupCreated(path.display().to_string())),
                Err(e) => {
                    msg_error!(Message::BackupFailed(e.to_string()));
                    return Err(e.into());
                }
            }
        }
        BackupCommand::Restore { file, yes } => {
            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmRestore(file.display().to_string()).to_string())
                    .default(false)
                    .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }

            let mut db = open_db(store)?;
            let outcome = manager.restore(&mut db, &file)?;
            msg_info!(Message::SafetySnapshotCreated(outcome.safety_snapshot.display().to_string()));
            msg_success!(Message::RestoreCompleted(file.display().to_string()));
            msg_warning!(Message::RestartRequired);
        }
        BackupCommand::List => {
            let files = manager.list()?;
            if files.is_empty() {
                msg_info!(Message::NoBackups);
                return Ok(());
            }
            msg_print!(Message::BackupsHeader, true);
            View::backups(&files);
        }
        BackupCommand::Cleanup { retain } => {
            let retain = retain.unwrap_or(store.config().backup_retention);
            let removed = manager.cleanup(retain)?;
            msg_success!(Message::BackupsRemoved(removed.len()));
        }
    }

    Ok(())
}
