use super::open_db;
use crate::db::records::Records;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: DeleteArgs, store: &ConfigStore) -> Result<()> {
    let db = open_db(store)?;
    let records = Records::new(&db);

    if records.try_get_by_id(args.id)?.is_none() {
        msg_bail_anyhow!(Message::RecordNotFound(args.id));
    }

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteRecord(args.id).to_string())
            .default(false)
            .interact()?;

    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    records.delete(args.id)?;
    msg_success!(Message::RecordDeleted(args.id));
    Ok(())
}
