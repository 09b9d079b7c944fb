use super::open_db;
use crate::db::records::Records;
use crate::libs::config::ConfigStore;
use crate::libs::input::{clean_details, optional_text, parse_date, resolve_task, validate_status};
use crate::libs::messages::Message;
use crate::libs::record::WorkLogEntry;
use crate::{msg_bail_anyhow, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EditArgs {
    id: i64,
    /// New task description, or the 1-based number of a main task
    #[arg(short, long)]
    task: Option<String>,
    #[arg(short = 'D', long)]
    date: Option<String>,
    /// New department; an empty string clears it
    #[arg(short, long)]
    department: Option<String>,
    /// New details; an empty string clears them
    #[arg(short = 'm', long)]
    details: Option<String>,
    #[arg(short, long)]
    status: Option<String>,
    #[arg(short, long)]
    attach: Option<PathBuf>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.date.is_none()
            && self.department.is_none()
            && self.details.is_none()
            && self.status.is_none()
            && self.attach.is_none()
    }
}

pub fn cmd(args: EditArgs, store: &ConfigStore) -> Result<()> {
    if args.is_empty() {
        msg_info!(Message::NoChangesProvided);
        return Ok(());
    }

    let config = store.config();
    let db = open_db(store)?;
    let records = Records::new(&db);

    let Some(current) = records.try_get_by_id(args.id)? else {
        msg_bail_anyhow!(Message::RecordNotFound(args.id));
    };

    let mut entry = WorkLogEntry::from(&current);
    if let Some(date) = args.date.as_deref() {
        entry.work_date = parse_date(date)?;
    }
    if let Some(task) = args.task.as_deref() {
        entry.task_description = resolve_task(task, &config.main_tasks)?;
    }
    if args.department.is_some() {
        entry.department = optional_text(args.department);
    }
    if args.details.is_some() {
        entry.details = clean_details(args.details);
    }
    if let Some(status) = args.status.as_deref() {
        entry.status = validate_status(status, &config.statuses)?;
    }

    if entry != WorkLogEntry::from(&current) && records.update(args.id, &entry)? == 0 {
        msg_bail_anyhow!(Message::RecordNotFound(args.id));
    }

    if let Some(path) = args.attach {
        let path = path.display().to_string();
        records.set_attachment(args.id, Some(&path))?;
        msg_success!(Message::AttachmentSet(args.id, path));
    }

    msg_success!(Message::RecordUpdated(args.id));
    Ok(())
}
