use serde::{Deserialize, Serialize};

/// Soft cap for `details`; enforced by callers before insert.
pub const DETAILS_MAX_CHARS: usize = 1000;

/// A full row of the `work_diary` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLogRecord {
    pub id: i64,
    pub work_date: String,
    pub task_description: String,
    pub department: Option<String>,
    pub details: Option<String>,
    pub status: String,
    pub created_at: String,
    pub attachment_path: Option<String>,
}

/// The mutable fields of a record, as supplied to add/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    pub work_date: String,
    pub task_description: String,
    pub department: Option<String>,
    pub details: Option<String>,
    pub status: String,
}

impl WorkLogEntry {
    pub fn new(work_date: &str, task_description: &str, department: Option<&str>, details: Option<&str>, status: &str) -> Self {
        WorkLogEntry {
            work_date: work_date.to_string(),
            task_description: task_description.to_string(),
            department: department.map(str::to_string),
            details: details.map(str::to_string),
            status: status.to_string(),
        }
    }
}

impl From<&WorkLogRecord> for WorkLogEntry {
    fn from(record: &WorkLogRecord) -> Self {
        WorkLogEntry {
            work_date: record.work_date.clone(),
            task_description: record.task_description.clone(),
            department: record.department.clone(),
            details: record.details.clone(),
            status: record.status.clone(),
        }
    }
}

/// Projection returned by the recent-records query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRecord {
    pub id: i64,
    pub work_date: String,
    pub task_description: String,
    pub status: String,
    pub department: Option<String>,
}

/// Projection returned by report queries and consumed by exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub work_date: String,
    pub task_description: String,
    pub department: Option<String>,
    pub details: Option<String>,
    pub status: String,
}

/// Parameters of a report query.
///
/// `from` and `to` bound `work_date` inclusively. `None` (or an empty string)
/// for `task`/`status` means no restriction on that column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportFilter {
    pub from: String,
    pub to: String,
    pub task: Option<String>,
    pub status: Option<String>,
}

impl ReportFilter {
    pub fn new(from: &str, to: &str) -> Self {
        ReportFilter {
            from: from.to_string(),
            to: to.to_string(),
            task: None,
            status: None,
        }
    }

    pub fn with_task(mut self, task: &str) -> Self {
        self.task = Some(task.to_string());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }
}

/// Truncates `details` to [`DETAILS_MAX_CHARS`] characters.
pub fn truncate_details(details: &str) -> String {
    details.chars().take(DETAILS_MAX_CHARS).collect()
}
