//! Report export to CSV, JSON and Excel.
//!
//! Exports run on a blocking worker thread with their own database
//! connection, so a long export never holds up the primary connection.

use crate::db::db::Db;
use crate::db::queries::query_report;
use crate::libs::record::{ReportFilter, ReportRow};
use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Color, Format, Workbook};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const REPORT_HEADERS: [&str; 5] = ["Date", "Task", "Department", "Details", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the file is named
    /// `work_report_<timestamp>.<ext>` in the current directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "work_report_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes `rows` in the configured format.
    pub fn write(&self, rows: &[ReportRow]) -> Result<()> {
        match self.format {
            ExportFormat::Csv => self.write_csv(rows),
            ExportFormat::Json => self.write_json(rows),
            ExportFormat::Excel => self.write_excel(rows),
        }
        .with_context(|| format!("writing {}", self.output_path.display()))
    }

    fn write_csv(&self, rows: &[ReportRow]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(REPORT_HEADERS)?;
        for row in rows {
            wtr.write_record([
                row.work_date.as_str(),
                row.task_description.as_str(),
                row.department.as_deref().unwrap_or(""),
                row.details.as_deref().unwrap_or(""),
                row.status.as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_json(&self, rows: &[ReportRow]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn write_excel(&self, rows: &[ReportRow]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Work report")?;

        let header_format = Format::new().set_bold().set_background_color(Color::Gray);
        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        let wrap = Format::new().set_text_wrap();
        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            worksheet.write_string(r, 0, &row.work_date)?;
            worksheet.write_string(r, 1, &row.task_description)?;
            worksheet.write_string(r, 2, row.department.as_deref().unwrap_or(""))?;
            worksheet.write_string_with_format(r, 3, row.details.as_deref().unwrap_or(""), &wrap)?;
            worksheet.write_string(r, 4, &row.status)?;
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}

/// Runs a filtered report query and writes the result with `exporter`.
///
/// Work happens on a blocking worker that opens its own connection to
/// `db_path` and drops it before returning. Returns the number of rows
/// written; with no matching rows nothing is written and 0 is returned.
pub async fn export_report(db_path: PathBuf, filter: ReportFilter, exporter: Exporter) -> Result<usize> {
    tokio::task::spawn_blocking(move || -> Result<usize> {
        let db = Db::new_without_migrations(&db_path)?;
        let rows = query_report(db.conn()?, &filter)?;
        drop(db);

        if rows.is_empty() {
            tracing::info!(from = %filter.from, to = %filter.to, "no rows to export");
            return Ok(0);
        }

        exporter.write(&rows)?;
        tracing::info!(rows = rows.len(), path = %exporter.output_path().display(), "report exported");
        Ok(rows.len())
    })
    .await
    .context("export worker panicked")?
}
