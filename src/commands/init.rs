use super::open_db;
use crate::db::migrations::get_db_version;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;

pub fn cmd(store: &ConfigStore) -> Result<()> {
    let db = open_db(store)?;
    let version = get_db_version(db.conn()?)?;

    msg_success!(Message::InitCompleted(db.path().display().to_string()));
    msg_info!(Message::InitDatabaseVersion(version));
    Ok(())
}
