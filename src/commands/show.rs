use super::open_db;
use crate::db::records::Records;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    id: i64,
}

pub fn cmd(args: ShowArgs, store: &ConfigStore) -> Result<()> {
    let db = open_db(store)?;

    let Some(record) = Records::new(&db).try_get_by_id(args.id)? else {
        msg_bail_anyhow!(Message::RecordNotFound(args.id));
    };

    msg_print!(Message::RecordDetailsHeader(record.id), true);
    View::record(&record);
    Ok(())
}
