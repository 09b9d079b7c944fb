//! File-level backup, restore and retention of the diary database.
//!
//! Every operation here copies the database file byte for byte, so the live
//! connection is closed for the duration of the copy. Backups reopen it
//! afterwards, on success and on failure. Restores leave it closed: the
//! replaced file invalidates everything the process knew about the old one,
//! so the caller must restart.
//!
//! Only files named like the ones this module writes (`wdiary_backup_*.db`
//! and `pre_restore_*.db`) count as backups, so a backup directory shared
//! with other databases is safe to clean up.

use crate::db::db::Db;
use crate::db::error::{StoreError, StoreResult};
use chrono::{DateTime, Local, Utc};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "wdiary_backup_";
const SAFETY_PREFIX: &str = "pre_restore_";
const BACKUP_EXTENSION: &str = "db";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// A backup file found in the backup directory.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupFile {
    pub path: PathBuf,
    /// Last modification time; the retention order.
    pub modified: DateTime<Local>,
    /// Size in bytes.
    pub size: u64,
}

impl BackupFile {
    /// File name without the directory, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of a successful restore. The connection is closed at this point.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOutcome {
    /// Copy of the database as it was before the restore.
    pub safety_snapshot: PathBuf,
}

/// Backup operations against one backup directory.
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    /// The directory is created on the first backup, not here.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        BackupManager {
            backup_dir: backup_dir.into(),
        }
    }

    /// Copies the database file to `dest`.
    ///
    /// `dest` must not be the live database file itself. The connection is
    /// reopened whether or not the copy succeeded. If the reopen itself fails
    /// the result is [`StoreError::Reopen`], which takes precedence over a
    /// copy error.
    pub fn backup(&self, db: &mut Db, dest: &Path) -> StoreResult<PathBuf> {
        if is_same_file(db.path(), dest) {
            return Err(StoreError::LiveDatabase(dest.to_path_buf()));
        }

        db.close()?;
        let copied = copy_file(db.path(), dest);
        reopen(db, "backup")?;

        copied.map_err(|source| StoreError::Backup {
            path: dest.to_path_buf(),
            source,
        })?;

        tracing::info!(source = %db.path().display(), dest = %dest.display(), "database backup created");
        Ok(dest.to_path_buf())
    }

    /// Backs up into the backup directory under a timestamped file name.
    pub fn backup_to_dir(&self, db: &mut Db) -> StoreResult<PathBuf> {
        let dest = self.timestamped_path(BACKUP_PREFIX);
        self.backup(db, &dest)
    }

    /// Replaces the live database with the contents of `source`.
    ///
    /// The current file is first copied to a `pre_restore_*` snapshot in the
    /// backup directory. If the snapshot fails the connection is reopened and
    /// nothing is overwritten. Once the overwrite starts the connection stays
    /// closed: on success the caller must restart, on failure the database
    /// needs manual recovery from the snapshot.
    pub fn restore(&self, db: &mut Db, source: &Path) -> StoreResult<RestoreOutcome> {
        if !source.is_file() {
            return Err(StoreError::RestoreSourceMissing(source.to_path_buf()));
        }
        if is_same_file(db.path(), source) {
            return Err(StoreError::LiveDatabase(source.to_path_buf()));
        }

        db.close()?;

        let safety_snapshot = self.timestamped_path(SAFETY_PREFIX);
        if let Err(e) = copy_file(db.path(), &safety_snapshot) {
            reopen(db, "failed restore")?;
            return Err(StoreError::SafetySnapshot {
                path: safety_snapshot,
                source: e,
            });
        }
        tracing::info!(snapshot = %safety_snapshot.display(), "pre-restore snapshot created");

        // Side files of the old database would be replayed into the new one.
        for side in side_files(db.path()) {
            if side.exists() {
                if let Err(e) = fs::remove_file(&side) {
                    tracing::warn!(path = %side.display(), error = %e, "failed to remove database side file");
                }
            }
        }

        if let Err(e) = fs::copy(source, db.path()) {
            tracing::error!(
                source = %source.display(),
                target = %db.path().display(),
                snapshot = %safety_snapshot.display(),
                error = %e,
                "restore overwrite failed; database requires manual recovery"
            );
            return Err(StoreError::RestoreOverwrite {
                source_path: source.to_path_buf(),
                target: db.path().to_path_buf(),
                source: e,
            });
        }

        tracing::info!(source = %source.display(), target = %db.path().display(), "database restored");
        Ok(RestoreOutcome { safety_snapshot })
    }

    /// Backup files in the backup directory, newest first.
    ///
    /// A missing directory yields an empty list.
    pub fn list(&self) -> StoreResult<Vec<BackupFile>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let dir_error = |source| StoreError::BackupDir {
            path: self.backup_dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.backup_dir).map_err(dir_error)? {
            let path = entry.map_err(dir_error)?.path();
            if !path.is_file() || !is_backup_name(&path) {
                continue;
            }
            let metadata = fs::metadata(&path).map_err(dir_error)?;
            let modified = metadata.modified().map_err(dir_error)?;
            files.push(BackupFile {
                path,
                modified: DateTime::<Local>::from(modified),
                size: metadata.len(),
            });
        }

        // Stable sort: equal timestamps keep directory iteration order.
        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Keeps the newest `retain` backups and deletes the rest.
    ///
    /// Returns the deleted paths.
    pub fn cleanup(&self, retain: usize) -> StoreResult<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for file in self.list()?.into_iter().skip(retain) {
            fs::remove_file(&file.path).map_err(|source| StoreError::BackupDir {
                path: file.path.clone(),
                source,
            })?;
            tracing::debug!(path = %file.path.display(), "old backup removed");
            removed.push(file.path);
        }
        Ok(removed)
    }

    fn timestamped_path(&self, prefix: &str) -> PathBuf {
        let stamp = Utc::now().format(TIMESTAMP_FORMAT);
        self.backup_dir
            .join(format!("{}{}.{}", prefix, stamp, BACKUP_EXTENSION))
    }
}

fn is_backup_name(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(BACKUP_PREFIX) || name.starts_with(SAFETY_PREFIX));
    has_prefix && path.extension().and_then(|ext| ext.to_str()) == Some(BACKUP_EXTENSION)
}

/// Both paths exist and resolve to the same file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_file(from: &Path, to: &Path) -> std::io::Result<u64> {
    if let Some(dir) = to.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::copy(from, to)
}

fn reopen(db: &mut Db, operation: &'static str) -> StoreResult<()> {
    let reopened = db.open().map(|_| ());
    reopened.map_err(|e| {
        tracing::error!(path = %db.path().display(), error = %e, "failed to reopen database after {}", operation);
        StoreError::Reopen {
            operation,
            source: Box::new(e),
        }
    })
}

fn side_files(db_path: &Path) -> [PathBuf; 2] {
    ["-wal", "-shm"].map(|suffix| {
        let mut name = OsString::from(db_path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    })
}
