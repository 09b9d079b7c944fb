#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use wdiary::db::db::Db;
    use wdiary::db::records::Records;
    use wdiary::libs::export::{export_report, ExportFormat, Exporter};
    use wdiary::libs::record::{ReportFilter, ReportRow, WorkLogEntry};

    struct ExportTestContext {
        db: Db,
        db_path: PathBuf,
        temp_dir: TempDir,
    }

    impl AsyncTestContext for ExportTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("work_diary.db");
            let db = Db::open_at(&db_path).unwrap();

            let records = Records::new(&db);
            for (date, task, department, details, status) in [
                ("2024-04-01", "Network", Some("IT"), Some("Patched firewall, rebooted"), "Completed"),
                ("2024-04-02", "Support", Some("HR"), None, "In progress"),
                ("2024-04-10", "Network", None, Some("Cabling"), "Paused"),
                ("2024-05-01", "Support", Some("IT"), None, "Completed"),
            ] {
                records
                    .add(&WorkLogEntry::new(date, task, department, details, status))
                    .unwrap();
            }

            ExportTestContext { db, db_path, temp_dir }
        }
    }

    impl ExportTestContext {
        fn output(&self, name: &str) -> PathBuf {
            self.temp_dir.path().join(name)
        }
    }

    fn april() -> ReportFilter {
        ReportFilter::new("2024-04-01", "2024-04-30")
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_csv_export(ctx: &mut ExportTestContext) {
        let output = ctx.output("report.csv");
        let exporter = Exporter::new(ExportFormat::Csv, Some(output.clone()));

        let rows = export_report(ctx.db_path.clone(), april(), exporter).await.unwrap();
        assert_eq!(rows, 3);

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, vec!["Date", "Task", "Department", "Details", "Status"]);

        let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "2024-04-10");
        assert_eq!(&records[0][2], "");
        assert_eq!(&records[2][3], "Patched firewall, rebooted");
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_json_export_matches_query(ctx: &mut ExportTestContext) {
        let output = ctx.output("report.json");
        let filter = april().with_task("Network");
        let exporter = Exporter::new(ExportFormat::Json, Some(output.clone()));

        let rows = export_report(ctx.db_path.clone(), filter, exporter).await.unwrap();
        assert_eq!(rows, 2);

        let exported: Vec<ReportRow> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(exported.len(), 2);
        assert!(exported.iter().all(|r| r.task_description == "Network"));
        assert_eq!(exported[0].status, "Paused");
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_excel_export_writes_workbook(ctx: &mut ExportTestContext) {
        let output = ctx.output("report.xlsx");
        let exporter = Exporter::new(ExportFormat::Excel, Some(output.clone()));

        let rows = export_report(ctx.db_path.clone(), april(), exporter).await.unwrap();
        assert_eq!(rows, 3);
        // xlsx files are zip archives
        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_empty_result_writes_nothing(ctx: &mut ExportTestContext) {
        let output = ctx.output("empty.csv");
        let exporter = Exporter::new(ExportFormat::Csv, Some(output.clone()));

        let rows = export_report(ctx.db_path.clone(), ReportFilter::new("2030-01-01", "2030-12-31"), exporter)
            .await
            .unwrap();
        assert_eq!(rows, 0);
        assert!(!output.exists());
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_primary_connection_stays_usable(ctx: &mut ExportTestContext) {
        let exporter = Exporter::new(ExportFormat::Csv, Some(ctx.output("concurrent.csv")));
        let export = tokio::spawn(export_report(ctx.db_path.clone(), april(), exporter));

        Records::new(&ctx.db)
            .add(&WorkLogEntry::new("2024-06-01", "Meeting", None, None, "Completed"))
            .unwrap();

        assert!(export.await.unwrap().unwrap() >= 3);
        assert_eq!(Records::new(&ctx.db).count(), 5);
    }

    #[test_context(ExportTestContext)]
    #[tokio::test]
    async fn test_default_output_name(_ctx: &mut ExportTestContext) {
        let exporter = Exporter::new(ExportFormat::Excel, None);
        let name = exporter.output_path().to_string_lossy().into_owned();
        assert!(name.starts_with("work_report_"));
        assert!(name.ends_with(".xlsx"));
    }
}
