//! Record store: insert, update, delete and point lookups on `work_diary`.
//!
//! Writes are committed before the call returns and surface failures as
//! [`StoreError::Write`]. Reads come in two flavours like the query layer:
//! the plain one logs and returns an empty value, `try_*` returns the error.

use super::db::Db;
use super::error::{StoreError, StoreResult};
use crate::libs::record::{WorkLogEntry, WorkLogRecord};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

const INSERT_RECORD: &str = "INSERT INTO work_diary (work_date, task_description, department, details, status, created_at, attachment_path)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_RECORD: &str = "UPDATE work_diary SET work_date = ?2, task_description = ?3, department = ?4, details = ?5, status = ?6
    WHERE id = ?1";
const UPDATE_ATTACHMENT: &str = "UPDATE work_diary SET attachment_path = ?2 WHERE id = ?1";
const DELETE_RECORD: &str = "DELETE FROM work_diary WHERE id = ?1";
const SELECT_BY_ID: &str = "SELECT id, work_date, task_description, department, details, status, created_at, attachment_path
    FROM work_diary WHERE id = ?1";
const COUNT_RECORDS: &str = "SELECT COUNT(*) FROM work_diary";

/// Same clock and layout as SQLite's `CURRENT_TIMESTAMP` column default.
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CRUD access to the work log through a borrowed [`Db`].
pub struct Records<'a> {
    db: &'a Db,
}

impl<'a> Records<'a> {
    pub fn new(db: &'a Db) -> Self {
        Records { db }
    }

    /// Inserts a new row and returns its id. `created_at` is the current UTC time.
    pub fn add(&self, entry: &WorkLogEntry) -> StoreResult<i64> {
        self.add_with_attachment(entry, None)
    }

    /// Like [`Records::add`], writing the attachment path in the same insert.
    pub fn add_with_attachment(&self, entry: &WorkLogEntry, attachment: Option<&str>) -> StoreResult<i64> {
        let conn = self.db.conn()?;
        let created_at = Utc::now().format(CREATED_AT_FORMAT).to_string();
        conn.execute(
            INSERT_RECORD,
            params![
                entry.work_date,
                entry.task_description,
                entry.department,
                entry.details,
                entry.status,
                created_at,
                attachment
            ],
        )
        .map_err(StoreError::write("add"))?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, work_date = %entry.work_date, "record added");
        Ok(id)
    }

    /// Overwrites every mutable field of row `id`.
    ///
    /// Returns the number of affected rows; a missing id is not an error and
    /// yields 0.
    pub fn update(&self, id: i64, entry: &WorkLogEntry) -> StoreResult<usize> {
        let affected = self
            .db
            .conn()?
            .execute(
                UPDATE_RECORD,
                params![id, entry.work_date, entry.task_description, entry.department, entry.details, entry.status],
            )
            .map_err(StoreError::write("update"))?;
        tracing::debug!(id, affected, "record updated");
        Ok(affected)
    }

    /// Sets or clears the attachment path of row `id`.
    pub fn set_attachment(&self, id: i64, path: Option<&str>) -> StoreResult<usize> {
        let affected = self
            .db
            .conn()?
            .execute(UPDATE_ATTACHMENT, params![id, path])
            .map_err(StoreError::write("attach file to"))?;
        Ok(affected)
    }

    /// Permanently removes row `id`. A missing id yields 0.
    pub fn delete(&self, id: i64) -> StoreResult<usize> {
        let affected = self
            .db
            .conn()?
            .execute(DELETE_RECORD, params![id])
            .map_err(StoreError::write("delete"))?;
        tracing::debug!(id, affected, "record deleted");
        Ok(affected)
    }

    /// Point lookup. Read failures are logged and reported as absent.
    pub fn get_by_id(&self, id: i64) -> Option<WorkLogRecord> {
        self.try_get_by_id(id).unwrap_or_else(|e| {
            tracing::error!(id, error = %e, "failed to get record by id");
            None
        })
    }

    /// Point lookup that reports read failures.
    pub fn try_get_by_id(&self, id: i64) -> StoreResult<Option<WorkLogRecord>> {
        let record = self.db.conn()?.query_row(SELECT_BY_ID, params![id], record_from_row).optional()?;
        Ok(record)
    }

    /// Total number of rows; 0 when the query fails.
    pub fn count(&self) -> i64 {
        self.try_count().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to count records");
            0
        })
    }

    /// Total number of rows, or the read error.
    pub fn try_count(&self) -> StoreResult<i64> {
        Ok(self.db.conn()?.query_row(COUNT_RECORDS, [], |row| row.get(0))?)
    }
}

fn record_from_row(row: &Row) -> rusqlite::Result<WorkLogRecord> {
    Ok(WorkLogRecord {
        id: row.get(0)?,
        work_date: row.get(1)?,
        task_description: row.get(2)?,
        department: row.get(3)?,
        details: row.get(4)?,
        status: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        attachment_path: row.get(7)?,
    })
}
