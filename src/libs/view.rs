use super::backup::BackupFile;
use super::record::{RecentRecord, ReportRow, WorkLogRecord};
use crate::db::migrations::AppliedMigration;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn recent(records: &[RecentRecord]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "TASK", "DEPARTMENT", "STATUS"]);
        for record in records {
            table.add_row(row![
                record.id,
                record.work_date,
                record.task_description,
                record.department.as_deref().unwrap_or("-"),
                record.status
            ]);
        }
        table.printstd();
    }

    pub fn record(record: &WorkLogRecord) {
        let mut table = Table::new();

        table.add_row(row!["Date", record.work_date]);
        table.add_row(row!["Task", record.task_description]);
        table.add_row(row!["Department", record.department.as_deref().unwrap_or("-")]);
        table.add_row(row!["Details", record.details.as_deref().unwrap_or("")]);
        table.add_row(row!["Status", record.status]);
        table.add_row(row!["Created", record.created_at]);
        if let Some(path) = &record.attachment_path {
            table.add_row(row!["Attachment", path]);
        }
        table.printstd();
    }

    pub fn report(rows: &[ReportRow]) {
        let mut table = Table::new();

        table.add_row(row!["DATE", "TASK", "DEPARTMENT", "DETAILS", "STATUS"]);
        for r in rows {
            table.add_row(row![
                r.work_date,
                r.task_description,
                r.department.as_deref().unwrap_or("-"),
                r.details.as_deref().unwrap_or(""),
                r.status
            ]);
        }
        table.printstd();
    }

    pub fn backups(files: &[BackupFile]) {
        let mut table = Table::new();

        table.add_row(row!["FILE", "MODIFIED", "SIZE (KB)"]);
        for file in files {
            table.add_row(row![
                file.file_name(),
                file.modified.format("%Y-%m-%d %H:%M:%S"),
                format!("{:.1}", file.size as f64 / 1024.0)
            ]);
        }
        table.printstd();
    }

    pub fn migrations(history: &[AppliedMigration]) {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED AT"]);
        for migration in history {
            table.add_row(row![migration.version, migration.name, migration.applied_at]);
        }
        table.printstd();
    }

    pub fn list(title: &str, items: &[String]) {
        let mut table = Table::new();

        table.add_row(row!["#", title]);
        for (i, item) in items.iter().enumerate() {
            table.add_row(row![i + 1, item]);
        }
        table.printstd();
    }
}
