//! Connection manager for the diary database file.
//!
//! A [`Db`] owns at most one live SQLite connection for a given file. The
//! connection can be closed and reopened so that file-level operations
//! (backup copies, restores) never race with reads or writes issued through
//! the same process.

use super::error::{StoreError, StoreResult};
use super::migrations::MigrationManager;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "work_diary.db";

/// Owner of the single connection to one database file.
pub struct Db {
    path: PathBuf,
    conn: Option<Connection>,
}

impl Db {
    /// Opens the database at `path` and brings its schema up to date with the
    /// built-in migrations.
    ///
    /// Any error returned here is fatal for the application: the store cannot
    /// run against an unmigrated schema.
    pub fn open_at(path: impl Into<PathBuf>) -> StoreResult<Db> {
        Self::open_with(path, &MigrationManager::new())
    }

    /// Opens the database and applies the migrations registered in `manager`.
    pub fn open_with(path: impl Into<PathBuf>, manager: &MigrationManager) -> StoreResult<Db> {
        let mut db = Self::new_without_migrations(path)?;
        manager.run_migrations(db.open()?)?;
        Ok(db)
    }

    /// Opens a connection without touching the schema.
    ///
    /// Used by migration inspection commands and by independent reader
    /// connections (report export workers) against a file that the primary
    /// connection already migrated.
    pub fn new_without_migrations(path: impl Into<PathBuf>) -> StoreResult<Db> {
        let mut db = Db { path: path.into(), conn: None };
        db.open()?;
        Ok(db)
    }

    /// Returns the live connection, opening it first when needed.
    ///
    /// Creates the parent directory if missing and switches the file to
    /// write-ahead logging so readers in other connections do not block the
    /// single writer.
    pub fn open(&mut self) -> StoreResult<&mut Connection> {
        if self.conn.is_none() {
            self.conn = Some(Self::connect(&self.path)?);
        }
        self.conn.as_mut().ok_or(StoreError::Closed)
    }

    /// Releases the connection. Calling it on a closed manager is a no-op.
    pub fn close(&mut self) -> StoreResult<()> {
        if let Some(conn) = self.conn.take() {
            if let Err((conn, source)) = conn.close() {
                // Keep the handle so the caller can retry instead of leaking it.
                self.conn = Some(conn);
                return Err(StoreError::Close(source));
            }
            tracing::debug!(path = %self.path.display(), "database connection closed");
        }
        Ok(())
    }

    /// False between [`Db::close`] and the next [`Db::open`].
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Borrows the live connection.
    ///
    /// Fails with [`StoreError::Closed`] between [`Db::close`] and the next
    /// [`Db::open`]; the handle must never be cached past that window.
    pub fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    /// The database file this manager opens.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(path: &Path) -> StoreResult<Connection> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let open_error = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(open_error)?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(open_error)?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "database connection opened");

        Ok(conn)
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to close database connection");
        }
    }
}
