//! Database schema migration management and versioning system.
//!
//! Brings a diary database from whatever schema version it carries to the
//! latest known one, one step at a time.
//!
//! ## Features
//!
//! - **Version Marker**: The applied version lives in `PRAGMA user_version`
//!   and is written in the same transaction as the step's effects
//! - **Ordered Application**: Steps run strictly in ascending version order,
//!   each only when its version exceeds the stored marker
//! - **Script Discovery**: Extra steps can be loaded from `NNNN_name.sql`
//!   files in a migrations directory
//! - **Statement Granularity**: Steps run one SQL statement at a time, so a
//!   statement whose effect already exists (duplicate column, existing table)
//!   is logged and skipped while the rest of the step still runs
//! - **History Tracking**: Every applied step is listed in `schema_migrations`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wdiary::db::migrations::{get_db_version, MigrationManager};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("work_diary.db")?;
//! MigrationManager::new().run_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::error::{StoreError, StoreResult};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success, msg_warning};
use rusqlite::{params, Connection, ErrorCode, Transaction};
use std::fs;
use std::path::{Path, PathBuf};

/// History of applied steps, kept next to the version marker.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";
const INSERT_HISTORY: &str = "INSERT OR REPLACE INTO schema_migrations (version, name) VALUES (?1, ?2)";
const SELECT_HISTORY: &str = "SELECT version, name, applied_at FROM schema_migrations ORDER BY version";
const HISTORY_EXISTS: &str = "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'";

/// Error message fragments SQLite reports when a step's effect is already present.
const REDUNDANT_EFFECT_MARKERS: &[&str] = &["duplicate column name", "already exists"];

/// A single versioned schema change.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: String,
    /// Individual SQL statements, executed in order.
    statements: Vec<String>,
}

impl Migration {
    /// Runs every statement inside `tx`.
    ///
    /// Statements whose effect is already present are skipped and returned;
    /// every other statement still runs. Any other error stops the step.
    fn apply(&self, tx: &Transaction) -> rusqlite::Result<Vec<rusqlite::Error>> {
        let mut redundant = Vec::new();
        for statement in &self.statements {
            match tx.execute_batch(statement) {
                Ok(()) => {}
                Err(e) if is_redundant_effect(&e) => redundant.push(e),
                Err(e) => return Err(e),
            }
        }
        Ok(redundant)
    }
}

/// Row of the `schema_migrations` history table.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMigration {
    pub version: u32,
    pub name: String,
    pub applied_at: String,
}

/// What a call to [`MigrationManager::run_migrations`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    /// Versions whose effects were written by this run.
    pub applied: Vec<u32>,
    /// Versions with at least one statement whose effect already existed.
    /// Their remaining statements were applied.
    pub tolerated: Vec<u32>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.tolerated.is_empty()
    }
}

/// Ordered registry of migration steps.
///
/// The manager is meant to run once during startup, before any other access
/// to the database file.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    /// Creates a manager holding the built-in schema history.
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Built-in steps plus every script found in `dir`.
    pub fn with_scripts_dir(dir: &Path) -> StoreResult<Self> {
        let mut manager = Self::new();
        manager.load_scripts(dir)?;
        Ok(manager)
    }

    fn register_migrations(&mut self) {
        // Version 1: the work log table and its lookup indexes
        self.add_builtin(
            1,
            "create_work_diary",
            &[
                "CREATE TABLE IF NOT EXISTS work_diary (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    work_date DATE NOT NULL,
                    task_description TEXT NOT NULL,
                    department TEXT,
                    details TEXT,
                    status TEXT DEFAULT 'In progress',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                "CREATE INDEX IF NOT EXISTS idx_work_date ON work_diary(work_date)",
                "CREATE INDEX IF NOT EXISTS idx_task ON work_diary(task_description)",
                "CREATE INDEX IF NOT EXISTS idx_status ON work_diary(status)",
            ],
        );

        // Version 2: optional file attachment per entry
        self.add_builtin(2, "add_attachment_path", &["ALTER TABLE work_diary ADD COLUMN attachment_path TEXT"]);
    }

    fn add_builtin(&mut self, version: u32, name: &str, statements: &[&str]) {
        self.push(Migration {
            version,
            name: name.to_string(),
            statements: statements.iter().map(|s| s.to_string()).collect(),
        });
    }

    fn push(&mut self, migration: Migration) {
        self.migrations.push(migration);
        self.migrations.sort_by_key(|m| m.version);
    }

    /// Registers an SQL script as the step for `version`.
    ///
    /// The script is split into statements up front; see [`split_statements`].
    pub fn add_script(&mut self, version: u32, name: &str, sql: &str) -> StoreResult<()> {
        if self.migrations.iter().any(|m| m.version == version) {
            return Err(StoreError::DuplicateMigration(version));
        }
        self.push(Migration {
            version,
            name: name.to_string(),
            statements: split_statements(sql),
        });
        Ok(())
    }

    /// Loads every `*.sql` file in `dir` whose name starts with a version number.
    ///
    /// A missing directory contributes no steps. Returns the number of scripts
    /// registered.
    pub fn load_scripts(&mut self, dir: &Path) -> StoreResult<usize> {
        if !dir.exists() {
            msg_debug!(format!("Migrations directory {} not found", dir.display()));
            return Ok(0);
        }

        let script_error = |path: &Path, reason: String| StoreError::MigrationScript {
            path: path.to_path_buf(),
            reason,
        };

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| script_error(dir, e.to_string()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "sql"))
            .collect();
        files.sort();

        let mut loaded = 0;
        for path in files {
            let Some((version, name)) = parse_script_name(&path) else {
                msg_debug!(format!("Skipping {}: no leading version number", path.display()));
                continue;
            };
            let sql = fs::read_to_string(&path).map_err(|e| script_error(&path, e.to_string()))?;
            match self.add_script(version, &name, &sql) {
                Ok(()) => loaded += 1,
                Err(StoreError::DuplicateMigration(v)) => {
                    return Err(script_error(&path, format!("version {} is already registered", v)));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(loaded)
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Steps that a database at `current` version still needs, in order.
    pub fn pending(&self, current: u32) -> Vec<&Migration> {
        self.migrations.iter().filter(|m| m.version > current).collect()
    }

    /// Applies every pending step in ascending order.
    ///
    /// Each step runs in its own transaction together with the version
    /// marker update, so the marker never points past a step that did not
    /// complete. A failing step rolls back and aborts the run; steps already
    /// committed stay applied.
    ///
    /// A database whose marker is beyond the latest known step is left
    /// untouched.
    pub fn run_migrations(&self, conn: &mut Connection) -> StoreResult<MigrationReport> {
        let current = read_user_version(conn).map_err(|source| StoreError::Migration {
            version: 0,
            name: "read_schema_version".to_string(),
            source,
        })?;
        let mut report = MigrationReport {
            from_version: current,
            to_version: current,
            ..Default::default()
        };

        let latest = self.latest_version();
        if current > latest {
            tracing::warn!(current, latest, "database schema is newer than this build; skipping migrations");
            msg_warning!(Message::DatabaseAheadOfApp(current, latest));
            return Ok(report);
        }

        let pending = self.pending(current);
        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(report);
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        for migration in pending {
            let step_error = |source| StoreError::Migration {
                version: migration.version,
                name: migration.name.clone(),
                source,
            };
            msg_info!(Message::RunningMigration(migration.version, migration.name.clone()));

            let tx = conn.transaction().map_err(step_error)?;
            match migration.apply(&tx) {
                Ok(redundant) if redundant.is_empty() => report.applied.push(migration.version),
                Ok(redundant) => {
                    for e in redundant {
                        tracing::warn!(version = migration.version, name = %migration.name, error = %e, "migration statement effect already present");
                        msg_warning!(Message::MigrationAlreadyApplied(migration.version, e.to_string()));
                    }
                    report.tolerated.push(migration.version);
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    // Dropping the transaction rolls the step back.
                    return Err(step_error(e));
                }
            }

            tx.execute(MIGRATIONS_TABLE, []).map_err(step_error)?;
            tx.execute(INSERT_HISTORY, params![migration.version, migration.name]).map_err(step_error)?;
            tx.pragma_update(None, "user_version", migration.version).map_err(step_error)?;
            tx.commit().map_err(step_error)?;

            report.to_version = migration.version;
            msg_success!(Message::MigrationCompleted(migration.version));
        }

        msg_success!(Message::AllMigrationsCompleted);
        Ok(report)
    }

    /// Lists applied steps from the history table, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> StoreResult<Vec<AppliedMigration>> {
        let exists: i64 = conn.query_row(HISTORY_EXISTS, [], |row| row.get(0))?;
        if exists == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(SELECT_HISTORY)?;
        let history = stmt
            .query_map([], |row| {
                Ok(AppliedMigration {
                    version: row.get(0)?,
                    name: row.get(1)?,
                    applied_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

/// Reads the schema version marker; an uninitialised file reports 0.
pub fn get_db_version(conn: &Connection) -> StoreResult<u32> {
    Ok(read_user_version(conn)?)
}

/// True when `manager` knows steps the database has not applied yet.
pub fn needs_migration(conn: &Connection, manager: &MigrationManager) -> StoreResult<bool> {
    Ok(get_db_version(conn)? < manager.latest_version())
}

/// A negative marker was not written by any release and is rejected.
fn read_user_version(conn: &Connection) -> rusqlite::Result<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, version))
}

/// SQLite reports a clashing object either when preparing the statement
/// (`SqlInputError`) or when stepping it (`SqliteFailure`).
fn is_redundant_effect(error: &rusqlite::Error) -> bool {
    let message = match error {
        rusqlite::Error::SqliteFailure(failure, Some(message)) if failure.code == ErrorCode::Unknown => message,
        rusqlite::Error::SqlInputError { error, msg, .. } if error.code == ErrorCode::Unknown => msg,
        _ => return false,
    };
    let message = message.to_lowercase();
    REDUNDANT_EFFECT_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Splits a script into single statements, each ending with its `;`.
///
/// Semicolons inside string literals, quoted identifiers and comments do not
/// end a statement. Inside `CREATE [TEMP] TRIGGER` only a `;` right after
/// `END` does. Blank and comment-only chunks are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut scanner = StatementScanner::default();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        match scanner.quote {
            Some(close) => {
                if c == close {
                    scanner.quote = None;
                }
                continue;
            }
            None if scanner.line_comment => {
                if c == '\n' {
                    scanner.line_comment = false;
                }
                continue;
            }
            None if scanner.block_comment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    current.push('/');
                    chars.next();
                    scanner.block_comment = false;
                }
                continue;
            }
            None => {}
        }

        if c.is_alphanumeric() || c == '_' {
            scanner.word.push(c);
            scanner.has_code = true;
            continue;
        }
        scanner.end_word();

        match c {
            '\'' | '"' | '`' => {
                scanner.quote = Some(c);
                scanner.has_code = true;
            }
            '[' => {
                scanner.quote = Some(']');
                scanner.has_code = true;
            }
            '-' if chars.peek() == Some(&'-') => scanner.line_comment = true,
            '/' if chars.peek() == Some(&'*') => {
                current.push('*');
                chars.next();
                scanner.block_comment = true;
            }
            ';' if !scanner.in_trigger() || scanner.last_word_is("END") => {
                if scanner.has_code {
                    statements.push(current.trim().to_string());
                }
                current.clear();
                scanner = StatementScanner::default();
            }
            ';' => scanner.last_word = None,
            c if !c.is_whitespace() => {
                scanner.last_word = None;
                scanner.has_code = true;
            }
            _ => {}
        }
    }

    if scanner.has_code {
        statements.push(current.trim().to_string());
    }
    statements
}

#[derive(Default)]
struct StatementScanner {
    quote: Option<char>,
    line_comment: bool,
    block_comment: bool,
    /// Seen anything besides whitespace, comments and `;`.
    has_code: bool,
    word: String,
    /// First three keywords, upper-cased, to recognise triggers.
    leading: Vec<String>,
    last_word: Option<String>,
}

impl StatementScanner {
    fn end_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.word).to_uppercase();
        if self.leading.len() < 3 {
            self.leading.push(word.clone());
        }
        self.last_word = Some(word);
    }

    fn in_trigger(&self) -> bool {
        let words: Vec<&str> = self.leading.iter().map(String::as_str).collect();
        matches!(
            words.as_slice(),
            ["CREATE", "TRIGGER", ..] | ["CREATE", "TEMP" | "TEMPORARY", "TRIGGER"]
        )
    }

    fn last_word_is(&self, word: &str) -> bool {
        self.last_word.as_deref() == Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_versioned_script_names() {
        assert_eq!(parse_script_name(Path::new("0003_add_notes.sql")), Some((3, "add_notes".to_string())));
        assert_eq!(parse_script_name(Path::new("12-index.sql")), Some((12, "index".to_string())));
        assert_eq!(parse_script_name(Path::new("7.sql")), Some((7, "script_7".to_string())));
        assert_eq!(parse_script_name(Path::new("readme.sql")), None);
        assert_eq!(parse_script_name(Path::new("0000_zero.sql")), None);
    }

    #[test]
    fn builtin_steps_are_ordered() {
        let manager = MigrationManager::new();
        let versions: Vec<u32> = manager.migrations().iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert_eq!(manager.latest_version(), 2);
    }

    #[test]
    fn scripts_are_split_into_statements() {
        let sql = "-- notes table
CREATE TABLE notes (body TEXT DEFAULT 'a;b');
/* index; on body */
CREATE INDEX idx_notes ON notes(body);
CREATE TRIGGER notes_touch AFTER INSERT ON notes BEGIN
    UPDATE notes SET body = body WHERE rowid = new.rowid;
END;
INSERT INTO notes VALUES ('tail')";

        let statements = split_statements(sql);
        assert_eq!(statements.len(), 4);
        assert!(statements[0].ends_with("DEFAULT 'a;b');"));
        assert!(statements[1].starts_with("/* index; on body */"));
        assert!(statements[2].starts_with("CREATE TRIGGER") && statements[2].ends_with("END;"));
        assert_eq!(statements[3], "INSERT INTO notes VALUES ('tail')");
    }

    #[test]
    fn comment_only_scripts_have_no_statements() {
        assert!(split_statements("-- nothing here\n/* or here */ ;\n").is_empty());
    }

    #[test]
    fn duplicate_script_version_is_rejected() {
        let mut manager = MigrationManager::new();
        let err = manager.add_script(2, "again", "SELECT 1").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateMigration(2)));
    }
}
