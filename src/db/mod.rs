//! Storage core for the work diary.
//!
//! ## Modules
//!
//! - [`db`]: connection manager owning the single live SQLite handle
//! - [`migrations`]: ordered, idempotent schema upgrades tracked through
//!   `PRAGMA user_version`
//! - [`records`]: add, update, delete and point lookups
//! - [`queries`]: recent records, departments and filtered reports
//! - [`error`]: the [`StoreError`](error::StoreError) taxonomy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wdiary::db::{db::Db, records::Records};
//! use wdiary::libs::record::WorkLogEntry;
//!
//! let db = Db::open_at("work_diary.db")?;
//! let id = Records::new(&db).add(&WorkLogEntry::new("2024-05-01", "Network", None, None, "Completed"))?;
//! # Ok::<(), wdiary::db::error::StoreError>(())
//! ```

/// Connection lifecycle: open, close, reopen.
pub mod db;

pub mod error;

/// Schema upgrade engine and migration history.
pub mod migrations;

pub mod queries;

pub mod records;
