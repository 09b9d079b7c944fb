#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use wdiary::db::db::Db;
    use wdiary::db::error::StoreError;
    use wdiary::db::migrations::{get_db_version, needs_migration, MigrationManager};

    struct MigrationTestContext {
        temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("work_diary.db");
            MigrationTestContext { temp_dir, db_path }
        }
    }

    fn has_column(conn: &Connection, column: &str) -> bool {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('work_diary')").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        columns.iter().any(|c| c == column)
    }

    fn total_changes(conn: &Connection) -> i64 {
        conn.query_row("SELECT total_changes()", [], |row| row.get(0)).unwrap()
    }

    fn table_exists(conn: &Connection, table: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_reaches_latest_version(ctx: &mut MigrationTestContext) {
        let db = Db::open_at(&ctx.db_path).unwrap();
        let conn = db.conn().unwrap();

        let manager = MigrationManager::new();
        assert_eq!(get_db_version(conn).unwrap(), manager.latest_version());
        assert!(!needs_migration(conn, &manager).unwrap());
        assert!(has_column(conn, "attachment_path"));

        let history = manager.get_migration_history(conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert_eq!(history[0].name, "create_work_diary");
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_second_run_is_noop(ctx: &mut MigrationTestContext) {
        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        let first = manager.run_migrations(db.open().unwrap()).unwrap();
        assert_eq!(first.applied, vec![1, 2]);
        assert_eq!((first.from_version, first.to_version), (0, 2));

        let changes_before = total_changes(db.conn().unwrap());
        let history_before = manager.get_migration_history(db.conn().unwrap()).unwrap();

        let second = manager.run_migrations(db.open().unwrap()).unwrap();
        assert!(second.is_noop());
        assert_eq!(second.to_version, 2);

        // Nothing was written on the second run.
        let conn = db.conn().unwrap();
        assert_eq!(total_changes(conn), changes_before);
        assert_eq!(manager.get_migration_history(conn).unwrap(), history_before);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_upgrade_from_version_one(ctx: &mut MigrationTestContext) {
        {
            let conn = Connection::open(&ctx.db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE work_diary (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    work_date DATE NOT NULL,
                    task_description TEXT NOT NULL,
                    department TEXT,
                    details TEXT,
                    status TEXT DEFAULT 'In progress',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );
                INSERT INTO work_diary (work_date, task_description) VALUES ('2023-12-01', 'Legacy entry');
                PRAGMA user_version = 1;",
            )
            .unwrap();
        }

        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        let report = MigrationManager::new().run_migrations(db.open().unwrap()).unwrap();
        assert_eq!(report.applied, vec![2]);

        let conn = db.conn().unwrap();
        assert_eq!(get_db_version(conn).unwrap(), 2);
        assert!(has_column(conn, "attachment_path"));
        let legacy: String = conn
            .query_row("SELECT task_description FROM work_diary", [], |row| row.get(0))
            .unwrap();
        assert_eq!(legacy, "Legacy entry");
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_existing_column_is_tolerated(ctx: &mut MigrationTestContext) {
        {
            // Schema already current but the marker was never written.
            let conn = Connection::open(&ctx.db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE work_diary (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    work_date DATE NOT NULL,
                    task_description TEXT NOT NULL,
                    department TEXT,
                    details TEXT,
                    status TEXT DEFAULT 'In progress',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    attachment_path TEXT
                );",
            )
            .unwrap();
        }

        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        let report = MigrationManager::new().run_migrations(db.open().unwrap()).unwrap();

        assert_eq!(report.applied, vec![1]);
        assert_eq!(report.tolerated, vec![2]);
        assert_eq!(get_db_version(db.conn().unwrap()).unwrap(), 2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_existing_table_in_script_is_tolerated(ctx: &mut MigrationTestContext) {
        {
            let db = Db::open_at(&ctx.db_path).unwrap();
            db.conn().unwrap().execute_batch("CREATE TABLE notes (id INTEGER);").unwrap();
        }

        let mut manager = MigrationManager::new();
        manager.add_script(3, "create_notes", "CREATE TABLE notes (id INTEGER);").unwrap();

        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        let report = manager.run_migrations(db.open().unwrap()).unwrap();
        assert_eq!(report.tolerated, vec![3]);
        assert_eq!(get_db_version(db.conn().unwrap()).unwrap(), 3);
        drop(db);

        // Startup through the connection manager succeeds as well.
        assert!(Db::open_with(&ctx.db_path, &manager).is_ok());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_statements_after_a_redundant_one_still_run(ctx: &mut MigrationTestContext) {
        {
            let db = Db::open_at(&ctx.db_path).unwrap();
            db.conn()
                .unwrap()
                .execute_batch("CREATE INDEX idx_department ON work_diary(department);")
                .unwrap();
        }

        let mut manager = MigrationManager::new();
        manager
            .add_script(
                3,
                "department_index_and_note",
                "CREATE INDEX idx_department ON work_diary(department);
                 ALTER TABLE work_diary ADD COLUMN note_id INTEGER;",
            )
            .unwrap();

        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        let report = manager.run_migrations(db.open().unwrap()).unwrap();

        let conn = db.conn().unwrap();
        assert_eq!(report.tolerated, vec![3]);
        assert_eq!(get_db_version(conn).unwrap(), 3);
        assert!(has_column(conn, "note_id"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_negative_marker_is_rejected(ctx: &mut MigrationTestContext) {
        {
            let conn = Connection::open(&ctx.db_path).unwrap();
            conn.pragma_update(None, "user_version", -1).unwrap();
        }

        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        assert!(get_db_version(db.conn().unwrap()).is_err());
        let err = MigrationManager::new().run_migrations(db.open().unwrap()).unwrap_err();
        assert!(err.is_fatal());
        assert!(!table_exists(db.conn().unwrap(), "work_diary"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_failed_step_rolls_back_and_keeps_marker(ctx: &mut MigrationTestContext) {
        let mut manager = MigrationManager::new();
        manager
            .add_script(3, "broken", "CREATE TABLE notes (id INTEGER); INSERT INTO missing_table VALUES (1);")
            .unwrap();

        let mut db = Db::new_without_migrations(&ctx.db_path).unwrap();
        let err = manager.run_migrations(db.open().unwrap()).unwrap_err();

        assert!(matches!(err, StoreError::Migration { version: 3, .. }));
        assert!(err.is_fatal());

        let conn = db.conn().unwrap();
        // Steps before the failure stay committed.
        assert_eq!(get_db_version(conn).unwrap(), 2);
        assert!(!table_exists(conn, "notes"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_open_fails_on_broken_step(ctx: &mut MigrationTestContext) {
        let mut manager = MigrationManager::new();
        manager.add_script(3, "broken", "THIS IS NOT SQL").unwrap();

        let result = Db::open_with(&ctx.db_path, &manager);
        assert!(matches!(result, Err(ref e) if e.is_fatal()));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_newer_marker_is_left_untouched(ctx: &mut MigrationTestContext) {
        {
            let db = Db::open_at(&ctx.db_path).unwrap();
            db.conn().unwrap().pragma_update(None, "user_version", 99).unwrap();
        }

        let db = Db::open_at(&ctx.db_path).unwrap();
        assert_eq!(get_db_version(db.conn().unwrap()).unwrap(), 99);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_scripts_are_loaded_in_version_order(ctx: &mut MigrationTestContext) {
        let scripts = ctx.temp_dir.path().join("migrations");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("0004_notes_index.sql"), "CREATE INDEX idx_notes_body ON notes(body);").unwrap();
        fs::write(scripts.join("0003_create_notes.sql"), "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);")
            .unwrap();
        fs::write(scripts.join("README.md"), "not a migration").unwrap();
        fs::write(scripts.join("draft.sql"), "SELECT 1;").unwrap();

        let manager = MigrationManager::with_scripts_dir(&scripts).unwrap();
        assert_eq!(manager.latest_version(), 4);

        let db = Db::open_with(&ctx.db_path, &manager).unwrap();
        let conn = db.conn().unwrap();
        assert_eq!(get_db_version(conn).unwrap(), 4);
        assert!(table_exists(conn, "notes"));

        let names: Vec<String> = manager
            .get_migration_history(conn)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["create_work_diary", "add_attachment_path", "create_notes", "notes_index"]);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_script_clashing_with_builtin_is_rejected(ctx: &mut MigrationTestContext) {
        let scripts = ctx.temp_dir.path().join("migrations");
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("0002_again.sql"), "SELECT 1;").unwrap();

        let err = MigrationManager::with_scripts_dir(&scripts).err().unwrap();
        assert!(matches!(err, StoreError::MigrationScript { .. }));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_missing_scripts_dir_adds_nothing(ctx: &mut MigrationTestContext) {
        let manager = MigrationManager::with_scripts_dir(&ctx.temp_dir.path().join("absent")).unwrap();
        assert_eq!(manager.latest_version(), 2);
    }
}
