//! The [`Message`] enum: one variant per user-facing string.
//!
//! Variants are grouped by the feature that emits them. Text lives in
//! [`display`](super::display).

#[derive(Debug, Clone)]
pub enum Message {
    // === RECORD MESSAGES ===
    RecordAdded(i64),
    RecordUpdated(i64),
    RecordDeleted(i64),
    RecordNotFound(i64),
    RecordAddFailed(String), // error
    RecordsHeader(usize),    // shown count
    RecordsShown(usize, i64), // shown, total
    RecordDetailsHeader(i64),
    NoRecordsFound,
    NoChangesProvided,
    AttachmentSet(i64, String), // id, path
    ConfirmDeleteRecord(i64),

    // === INPUT VALIDATION ===
    InvalidDate(String),
    InvalidDateRange(String, String), // from, to
    EmptyTaskDescription,
    TaskIndexOutOfRange(usize, usize), // index, available
    DetailsTruncated(usize),           // limit
    UnknownStatus(String),

    // === DEPARTMENTS ===
    DepartmentsHeader,
    NoDepartments,

    // === REPORT / EXPORT ===
    ReportHeader(String, String), // from, to
    ReportEmpty,
    ExportCompleted(usize, String), // rows, path
    ExportNothingToWrite,
    ExportFailed(String),

    // === BACKUP MESSAGES ===
    BackupCreated(String),
    BackupFailed(String),
    BackupsHeader,
    NoBackups,
    BackupsRemoved(usize),
    ConfirmRestore(String),
    SafetySnapshotCreated(String),
    RestoreCompleted(String),
    RestartRequired,

    // === CONFIGURATION MESSAGES ===
    ConfigCreated(String),
    ConfigMigrated(u32, u32), // from, to
    ConfigParseError(String),
    ConfigSaveError(String),

    // === MAIN TASK LIST ===
    MainTasksHeader,
    NoMainTasks,
    MainTaskAdded(String),
    MainTaskRemoved(String),
    MainTaskExists(String),
    MainTaskNotFound(String),

    // === INIT ===
    InitCompleted(String),           // database path
    InitDatabaseVersion(u32),

    // === GENERAL ===
    OperationCancelled,
    DatabaseOpenFailed(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),              // count
    RunningMigration(u32, String),       // version, name
    MigrationCompleted(u32),             // version
    MigrationAlreadyApplied(u32, String), // version, error
    MigrationFailed(u32, String),        // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    LatestKnownVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate(usize), // pending count
    DatabaseAheadOfApp(u32, u32), // stored, latest known
    MigrationHistory,
    NoMigrationHistory,
}
