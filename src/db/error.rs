//! Storage error taxonomy.
//!
//! Every failure the storage core can report is a [`StoreError`]. The
//! variants map onto four severities:
//!
//! - **Fatal**: the database cannot be opened or migrated; startup must stop.
//! - **Write**: a single add/update/delete failed; the caller reports it.
//! - **Read**: a query failed; the plain query helpers swallow it and return
//!   an empty value, the `try_*` helpers surface it.
//! - **Backup**: a file-level copy failed during backup or restore.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    // ---------------------------
    // Startup (fatal)
    // ---------------------------
    #[error("Failed to create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Migration v{version} ({name}) failed: {source}")]
    Migration {
        version: u32,
        name: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid migration script {path}: {reason}")]
    MigrationScript { path: PathBuf, reason: String },

    #[error("Migration version v{0} is registered twice")]
    DuplicateMigration(u32),

    // ---------------------------
    // Connection lifecycle
    // ---------------------------
    #[error("Database connection is closed")]
    Closed,

    #[error("Failed to close database connection: {0}")]
    Close(#[source] rusqlite::Error),

    // ---------------------------
    // Record store
    // ---------------------------
    #[error("Failed to {operation} record: {source}")]
    Write {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database query failed: {0}")]
    Read(#[from] rusqlite::Error),

    // ---------------------------
    // Backup / restore
    // ---------------------------
    #[error("Failed to copy database to {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Database could not be reopened after {operation}: {source}")]
    Reopen {
        operation: &'static str,
        #[source]
        source: Box<StoreError>,
    },

    #[error("{0} is the live database file")]
    LiveDatabase(PathBuf),

    #[error("Restore file not found: {0}")]
    RestoreSourceMissing(PathBuf),

    #[error("Failed to create safety snapshot {path}: {source}")]
    SafetySnapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to overwrite database {target} from {source_path}: {source}")]
    RestoreOverwrite {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Backup directory error at {path}: {source}")]
    BackupDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// True for failures that must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::CreateDir { .. }
                | StoreError::Open { .. }
                | StoreError::Migration { .. }
                | StoreError::MigrationScript { .. }
                | StoreError::DuplicateMigration(_)
        )
    }

    pub(crate) fn write(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
        move |source| StoreError::Write { operation, source }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
