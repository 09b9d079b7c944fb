use super::open_db;
use crate::db::queries::Queries;
use crate::libs::config::ConfigStore;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;

pub fn cmd(store: &ConfigStore) -> Result<()> {
    let db = open_db(store)?;
    let departments = Queries::new(&db).distinct_departments();

    if departments.is_empty() {
        msg_info!(Message::NoDepartments);
        return Ok(());
    }

    msg_print!(Message::DepartmentsHeader, true);
    View::list("DEPARTMENT", &departments);
    Ok(())
}
