//! Display implementation for [`Message`].
//!
//! All user-facing text is defined here so wording stays consistent across
//! commands. Parameters are interpolated with `format!`; variants without
//! parameters map to static strings.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === RECORD MESSAGES ===
            Message::RecordAdded(id) => format!("Work record #{} saved", id),
            Message::RecordUpdated(id) => format!("Work record #{} updated", id),
            Message::RecordDeleted(id) => format!("Work record #{} deleted", id),
            Message::RecordNotFound(id) => format!("Work record #{} not found", id),
            Message::RecordAddFailed(error) => format!("Failed to save work record: {}", error),
            Message::RecordsHeader(count) => format!("Recent work records ({})", count),
            Message::RecordsShown(shown, total) => format!("{} of {} records", shown, total),
            Message::RecordDetailsHeader(id) => format!("Work record #{}", id),
            Message::NoRecordsFound => "No work records yet".to_string(),
            Message::NoChangesProvided => "Nothing to change: pass at least one field to update".to_string(),
            Message::AttachmentSet(id, path) => format!("Attached {} to record #{}", path, id),
            Message::ConfirmDeleteRecord(id) => format!("Delete work record #{}?", id),

            // === INPUT VALIDATION ===
            Message::InvalidDate(date) => format!("Invalid date '{}', expected YYYY-MM-DD", date),
            Message::InvalidDateRange(from, to) => format!("Start date {} is after end date {}", from, to),
            Message::EmptyTaskDescription => "Task description must not be empty".to_string(),
            Message::TaskIndexOutOfRange(index, available) => {
                format!("Task #{} does not exist, {} main tasks configured", index, available)
            }
            Message::DetailsTruncated(limit) => format!("Details truncated to {} characters", limit),
            Message::UnknownStatus(status) => format!("Status '{}' is not in the configured status list", status),

            // === DEPARTMENTS ===
            Message::DepartmentsHeader => "Departments:".to_string(),
            Message::NoDepartments => "No departments recorded".to_string(),

            // === REPORT / EXPORT ===
            Message::ReportHeader(from, to) => format!("Work report {} .. {}", from, to),
            Message::ReportEmpty => "No records match the report filter".to_string(),
            Message::ExportCompleted(rows, path) => format!("Exported {} rows to {}", rows, path),
            Message::ExportNothingToWrite => "No records match the filter, nothing exported".to_string(),
            Message::ExportFailed(error) => format!("Export failed: {}", error),

            // === BACKUP MESSAGES ===
            Message::BackupCreated(path) => format!("Backup created: {}", path),
            Message::BackupFailed(error) => format!("Backup failed: {}", error),
            Message::BackupsHeader => "Available backups:".to_string(),
            Message::NoBackups => "No backups found".to_string(),
            Message::BackupsRemoved(count) => format!("Removed {} old backups", count),
            Message::ConfirmRestore(path) => format!("Replace the current database with {}?", path),
            Message::SafetySnapshotCreated(path) => format!("Current database saved to {}", path),
            Message::RestoreCompleted(path) => format!("Database restored from {}", path),
            Message::RestartRequired => "Restart wdiary to use the restored database".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigCreated(path) => format!("Default configuration written to {}", path),
            Message::ConfigMigrated(from, to) => format!("Configuration upgraded from v{} to v{}", from, to),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),
            Message::ConfigSaveError(error) => format!("Failed to save configuration: {}", error),

            // === MAIN TASK LIST ===
            Message::MainTasksHeader => "Main tasks:".to_string(),
            Message::NoMainTasks => "No main tasks configured".to_string(),
            Message::MainTaskAdded(task) => format!("Main task '{}' added", task),
            Message::MainTaskRemoved(task) => format!("Main task '{}' removed", task),
            Message::MainTaskExists(task) => format!("Main task '{}' already exists", task),
            Message::MainTaskNotFound(task) => format!("Main task '{}' not found", task),

            // === INIT ===
            Message::InitCompleted(path) => format!("Work diary ready at {}", path),
            Message::InitDatabaseVersion(version) => format!("Schema version: v{}", version),

            // === GENERAL ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::DatabaseOpenFailed(error) => format!("Cannot open the work diary database: {}", error),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationAlreadyApplied(version, error) => {
                format!("Migration v{} already in effect ({}), marking as applied", version, error)
            }
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::LatestKnownVersion(version) => format!("Latest known version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate(count) => format!("Database schema needs {} migrations", count),
            Message::DatabaseAheadOfApp(stored, latest) => format!(
                "Database schema v{} is newer than this build supports (v{}); leaving it untouched",
                stored, latest
            ),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::NoMigrationHistory => "No migration history recorded".to_string(),
        };

        write!(f, "{}", text)
    }
}
