use super::open_db;
use super::report::FilterArgs;
use crate::libs::config::ConfigStore;
use crate::libs::export::{export_report, ExportFormat, Exporter};
use crate::libs::messages::Message;
use crate::{msg_error, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,
    #[arg(short = 'F', long, value_enum, default_value = "excel")]
    format: ExportFormat,
    /// Output file, `work_report_<timestamp>.<ext>` when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn cmd(args: ExportArgs, store: &ConfigStore) -> Result<()> {
    let filter = args.filter.to_filter()?;

    // Migrate on the primary connection; the export worker only reads.
    let db = open_db(store)?;
    let db_path = db.path().to_path_buf();

    let exporter = Exporter::new(args.format, args.output);
    let output = exporter.output_path().display().to_string();

    match export_report(db_path, filter, exporter).await {
        Ok(0) => msg_info!(Message::ExportNothingToWrite),
        Ok(rows) => msg_success!(Message::ExportCompleted(rows, output)),
        Err(e) => {
            msg_error!(Message::ExportFailed(format!("{:#}", e)));
            return Err(e);
        }
    }
    Ok(())
}
