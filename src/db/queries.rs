//! Read-only queries: recent records, departments and filtered reports.
//!
//! Every query exists in two flavours. The plain method logs a failure and
//! returns an empty list so list screens keep working; the `try_*` method
//! surfaces the [`StoreError`](super::error::StoreError) to the caller.

use super::db::Db;
use super::error::StoreResult;
use crate::libs::record::{RecentRecord, ReportFilter, ReportRow};
use rusqlite::{params, Connection};

const SELECT_RECENT: &str = "SELECT id, work_date, task_description, status, department
    FROM work_diary
    ORDER BY work_date DESC, created_at DESC, id DESC
    LIMIT ?1";
const SELECT_DEPARTMENTS: &str = "SELECT DISTINCT department
    FROM work_diary
    WHERE department IS NOT NULL AND department != ''
    ORDER BY department";
const SELECT_REPORT: &str = "SELECT work_date, task_description, department, details, status
    FROM work_diary
    WHERE work_date BETWEEN ?1 AND ?2";

/// Read-only projections over the work log through a borrowed [`Db`].
pub struct Queries<'a> {
    db: &'a Db,
}

impl<'a> Queries<'a> {
    pub fn new(db: &'a Db) -> Self {
        Queries { db }
    }

    /// Up to `limit` records, newest work date first. Same-day records are
    /// ordered by creation time, newest first.
    pub fn recent(&self, limit: usize) -> Vec<RecentRecord> {
        self.try_recent(limit).unwrap_or_else(|e| {
            tracing::error!(limit, error = %e, "failed to load recent records");
            Vec::new()
        })
    }

    /// [`Queries::recent`] without swallowing read failures.
    pub fn try_recent(&self, limit: usize) -> StoreResult<Vec<RecentRecord>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(SELECT_RECENT)?;
        let records = stmt
            .query_map(params![limit as i64], |row| {
                Ok(RecentRecord {
                    id: row.get(0)?,
                    work_date: row.get(1)?,
                    task_description: row.get(2)?,
                    status: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    department: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Distinct non-empty departments in ascending order.
    pub fn distinct_departments(&self) -> Vec<String> {
        self.try_distinct_departments().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load departments");
            Vec::new()
        })
    }

    /// [`Queries::distinct_departments`] without swallowing read failures.
    pub fn try_distinct_departments(&self) -> StoreResult<Vec<String>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(SELECT_DEPARTMENTS)?;
        let departments = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(departments)
    }

    /// Report rows inside the filter's inclusive date range, newest first.
    pub fn filtered(&self, filter: &ReportFilter) -> Vec<ReportRow> {
        self.try_filtered(filter).unwrap_or_else(|e| {
            tracing::error!(from = %filter.from, to = %filter.to, error = %e, "failed to load report");
            Vec::new()
        })
    }

    /// [`Queries::filtered`] without swallowing read failures.
    pub fn try_filtered(&self, filter: &ReportFilter) -> StoreResult<Vec<ReportRow>> {
        query_report(self.db.conn()?, filter)
    }
}

/// Runs the report query on an arbitrary connection.
///
/// `task` and `status` restrict by exact match when set and non-empty.
///
/// Export workers call this with their own connection rather than sharing the
/// primary one.
pub fn query_report(conn: &Connection, filter: &ReportFilter) -> StoreResult<Vec<ReportRow>> {
    let mut sql = String::from(SELECT_REPORT);
    let mut values: Vec<&str> = vec![filter.from.as_str(), filter.to.as_str()];

    if let Some(task) = non_empty(&filter.task) {
        sql.push_str(" AND task_description = ?");
        values.push(task);
    }
    if let Some(status) = non_empty(&filter.status) {
        sql.push_str(" AND status = ?");
        values.push(status);
    }
    sql.push_str(" ORDER BY work_date DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(values), |row| {
            Ok(ReportRow {
                work_date: row.get(0)?,
                task_description: row.get(1)?,
                department: row.get(2)?,
                details: row.get(3)?,
                status: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
