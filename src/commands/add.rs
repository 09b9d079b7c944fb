use super::open_db;
use crate::db::records::Records;
use crate::libs::config::ConfigStore;
use crate::libs::input::{clean_details, optional_text, parse_date, resolve_task, today, validate_status};
use crate::libs::messages::Message;
use crate::libs::record::WorkLogEntry;
use crate::{msg_error, msg_success};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task description, or the 1-based number of a main task
    task: String,
    /// Work date (YYYY-MM-DD), today when omitted
    #[arg(short = 'D', long)]
    date: Option<String>,
    #[arg(short, long)]
    department: Option<String>,
    #[arg(short = 'm', long)]
    details: Option<String>,
    /// One of the configured statuses, the first one when omitted
    #[arg(short, long)]
    status: Option<String>,
    /// Path of a file to attach to the record
    #[arg(short, long)]
    attach: Option<PathBuf>,
}

pub fn cmd(args: AddArgs, store: &ConfigStore) -> Result<()> {
    let config = store.config();

    let entry = WorkLogEntry {
        work_date: args.date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today),
        task_description: resolve_task(&args.task, &config.main_tasks)?,
        department: optional_text(args.department),
        details: clean_details(args.details),
        status: match args.status {
            Some(status) => validate_status(&status, &config.statuses)?,
            None => config.default_status().to_string(),
        },
    };

    let db = open_db(store)?;
    let records = Records::new(&db);
    let attachment = args.attach.map(|path| path.display().to_string());
    let id = match records.add_with_attachment(&entry, attachment.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            msg_error!(Message::RecordAddFailed(e.to_string()));
            return Err(e.into());
        }
    };

    if let Some(path) = attachment {
        msg_success!(Message::AttachmentSet(id, path));
    }

    msg_success!(Message::RecordAdded(id));
    Ok(())
}
