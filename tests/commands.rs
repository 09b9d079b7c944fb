#[cfg(test)]
mod tests {
    use clap::{Args, Parser};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use wdiary::commands::{add, delete, edit, open_db, show};
    use wdiary::db::records::Records;
    use wdiary::libs::config::ConfigStore;
    use wdiary::libs::data_storage::DataStorage;

    /// Parses a single subcommand's arguments the way the CLI does.
    #[derive(Debug, Parser)]
    struct Invocation<T: Args> {
        #[command(flatten)]
        args: T,
    }

    fn parse<T: Args>(argv: &[&str]) -> T {
        let argv = std::iter::once("wdiary").chain(argv.iter().copied());
        Invocation::<T>::try_parse_from(argv).unwrap().args
    }

    struct CommandTestContext {
        store: ConfigStore,
        _temp_dir: TempDir,
    }

    impl TestContext for CommandTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let (store, _) = ConfigStore::open_in(DataStorage::at(temp_dir.path())).unwrap();
            CommandTestContext {
                store,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(CommandTestContext)]
    #[test]
    fn test_add_with_attachment_writes_one_row(ctx: &mut CommandTestContext) {
        add::cmd(parse(&["Printer repair", "-D", "2024-06-01", "-a", "invoice.pdf"]), &ctx.store).unwrap();

        let db = open_db(&ctx.store).unwrap();
        let records = Records::new(&db);
        assert_eq!(records.count(), 1);
        let record = records.get_by_id(1).unwrap();
        assert_eq!(record.task_description, "Printer repair");
        assert_eq!(record.attachment_path.as_deref(), Some("invoice.pdf"));
    }

    #[test_context(CommandTestContext)]
    #[test]
    fn test_missing_id_is_an_error(ctx: &mut CommandTestContext) {
        assert!(show::cmd(parse(&["42"]), &ctx.store).is_err());
        assert!(edit::cmd(parse(&["42", "--status", "Completed"]), &ctx.store).is_err());
        assert!(delete::cmd(parse(&["42", "--yes"]), &ctx.store).is_err());
    }

    #[test_context(CommandTestContext)]
    #[test]
    fn test_edit_and_delete_existing_record(ctx: &mut CommandTestContext) {
        add::cmd(parse(&["Network", "-D", "2024-06-01"]), &ctx.store).unwrap();

        edit::cmd(parse(&["1", "--status", "completed"]), &ctx.store).unwrap();
        {
            let db = open_db(&ctx.store).unwrap();
            assert_eq!(Records::new(&db).get_by_id(1).unwrap().status, "Completed");
        }

        delete::cmd(parse(&["1", "--yes"]), &ctx.store).unwrap();
        let db = open_db(&ctx.store).unwrap();
        assert_eq!(Records::new(&db).count(), 0);
    }
}
