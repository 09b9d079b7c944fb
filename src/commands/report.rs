use super::open_db;
use crate::db::queries::Queries;
use crate::libs::config::ConfigStore;
use crate::libs::input::{optional_text, parse_range};
use crate::libs::messages::Message;
use crate::libs::record::ReportFilter;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;

/// Date range and optional filters shared by `report` and `export`.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// First day of the range (YYYY-MM-DD), today when omitted
    #[arg(short, long)]
    pub from: Option<String>,
    /// Last day of the range (YYYY-MM-DD), today when omitted
    #[arg(short, long)]
    pub to: Option<String>,
    /// Only records with exactly this task description
    #[arg(long)]
    pub task: Option<String>,
    /// Only records with this status
    #[arg(short, long)]
    pub status: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<ReportFilter> {
        let (from, to) = parse_range(self.from.as_deref(), self.to.as_deref())?;
        Ok(ReportFilter {
            from,
            to,
            task: optional_text(self.task.clone()),
            status: optional_text(self.status.clone()),
        })
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    filter: FilterArgs,
}

pub fn cmd(args: ReportArgs, store: &ConfigStore) -> Result<()> {
    let filter = args.filter.to_filter()?;
    let db = open_db(store)?;
    let rows = Queries::new(&db).try_filtered(&filter)?;

    msg_print!(Message::ReportHeader(filter.from.clone(), filter.to.clone()), true);
    if rows.is_empty() {
        msg_info!(Message::ReportEmpty);
        return Ok(());
    }

    View::report(&rows);
    Ok(())
}
