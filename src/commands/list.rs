use super::open_db;
use crate::db::queries::Queries;
use crate::db::records::Records;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Maximum number of records, defaults to `recent_records_limit`
    #[arg(short, long)]
    limit: Option<usize>,
}

pub fn cmd(args: ListArgs, store: &ConfigStore) -> Result<()> {
    let db = open_db(store)?;
    let limit = args.limit.unwrap_or(store.config().recent_records_limit);
    let records = Queries::new(&db).recent(limit);

    if records.is_empty() {
        msg_info!(Message::NoRecordsFound);
        return Ok(());
    }

    msg_print!(Message::RecordsHeader(records.len()), true);
    View::recent(&records);
    msg_print!(Message::RecordsShown(records.len(), Records::new(&db).count()));
    Ok(())
}
