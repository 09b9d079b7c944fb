//! Application configuration.
//!
//! The configuration is a single pretty-printed JSON document stored as
//! `config.json` in the data directory. It is loaded once at startup through
//! [`ConfigStore::open`], upgraded in place by [`ConfigMigrator`] when it was
//! written by an older release, and handed to commands by reference.
//!
//! ## File layout
//!
//! ```json
//! {
//!   "config_version": 2,
//!   "database": "work_diary.db",
//!   "backup_dir": "backups",
//!   "recent_records_limit": 100,
//!   "backup_retention": 7,
//!   "main_tasks": ["Network and CCTV administration"],
//!   "statuses": ["In progress", "Completed", "Paused"]
//! }
//! ```
//!
//! Relative paths resolve against the data directory.

use super::data_storage::DataStorage;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Version written by this build; the last step in [`ConfigMigrator`].
pub const CONFIG_VERSION: u32 = 2;

pub const DEFAULT_STATUSES: [&str; 3] = ["In progress", "Completed", "Paused"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub config_version: u32,

    /// Database file. Relative to the data directory unless absolute.
    pub database: PathBuf,

    /// Where `backup create` writes snapshots.
    pub backup_dir: PathBuf,

    /// Optional directory of `NNNN_name.sql` scripts applied after the
    /// built-in migrations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations_dir: Option<PathBuf>,

    /// Row cap of the `list` command.
    pub recent_records_limit: usize,

    /// Number of backups `backup cleanup` keeps.
    pub backup_retention: usize,

    /// Predefined task descriptions, addressable by 1-based index.
    pub main_tasks: Vec<String>,

    pub statuses: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            config_version: CONFIG_VERSION,
            database: PathBuf::from(crate::db::db::DB_FILE_NAME),
            backup_dir: PathBuf::from("backups"),
            migrations_dir: None,
            recent_records_limit: 100,
            backup_retention: 7,
            main_tasks: vec![
                "Administer the computer network, security cameras and telephone exchange".to_string(),
                "Support and advise users on devices and application software".to_string(),
                "Coordinate on other department assignments".to_string(),
                "Carry out other duties assigned by the head of department".to_string(),
            ],
            statuses: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Status given to records created without one.
    pub fn default_status(&self) -> &str {
        self.statuses.first().map(String::as_str).unwrap_or(DEFAULT_STATUSES[0])
    }
}

/// What happened while loading the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLoad {
    /// The file existed and was current.
    Loaded,
    /// No file existed; defaults were written.
    Created,
    /// The file was upgraded from `from` to `to` and rewritten.
    Migrated { from: u32, to: u32 },
}

/// Owns the loaded [`Config`] together with where it lives on disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    storage: DataStorage,
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Loads `config.json` from the platform data directory.
    pub fn open() -> Result<(ConfigStore, ConfigLoad)> {
        Self::open_in(DataStorage::new())
    }

    /// Loads `config.json` from `storage`'s directory.
    ///
    /// A missing file yields defaults, which are written immediately. A file
    /// that is not valid JSON, or does not fit the typed layout after
    /// migration, is an error.
    pub fn open_in(storage: DataStorage) -> Result<(ConfigStore, ConfigLoad)> {
        let path = storage.get_path(CONFIG_FILE_NAME)?;

        if !path.exists() {
            let store = ConfigStore {
                storage,
                path,
                config: Config::default(),
            };
            store.save()?;
            return Ok((store, ConfigLoad::Created));
        }

        let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let mut document: Value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

        let (from, to) = ConfigMigrator::new().migrate(&mut document)?;
        let config: Config = serde_json::from_value(document).with_context(|| format!("parsing {}", path.display()))?;

        let store = ConfigStore { storage, path, config };
        if to > from {
            store.save()?;
            tracing::info!(from, to, "configuration upgraded");
            return Ok((store, ConfigLoad::Migrated { from, to }));
        }
        Ok((store, ConfigLoad::Loaded))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` and persists the result before returning.
    pub fn update<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Config),
    {
        change(&mut self.config);
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let file = File::create(&self.path).with_context(|| format!("writing {}", self.path.display()))?;
        serde_json::to_writer_pretty(&file, &self.config)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage.resolve(&self.config.database)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.storage.resolve(&self.config.backup_dir)
    }

    pub fn migrations_dir(&self) -> Option<PathBuf> {
        self.config.migrations_dir.as_deref().map(|dir| self.storage.resolve(dir))
    }
}

type ConfigStepFn = fn(&mut Map<String, Value>);

struct ConfigStep {
    version: u32,
    name: &'static str,
    apply: ConfigStepFn,
}

/// Ordered upgrades of the raw configuration document.
///
/// Each step runs only when its version exceeds the document's
/// `config_version` (0 when absent), strictly in ascending order, and stamps
/// its version into the document afterwards.
pub struct ConfigMigrator {
    steps: Vec<ConfigStep>,
}

/// Keys of the legacy flat layout that have no typed counterpart.
const LEGACY_DROPPED_KEYS: [&str; 6] = ["theme", "ui", "app_version", "db_version", "update_repo_url", "auto_update_check"];

impl ConfigMigrator {
    pub fn new() -> Self {
        ConfigMigrator {
            steps: vec![
                ConfigStep {
                    version: 1,
                    name: "typed_layout",
                    apply: |doc| {
                        if let Some(db_name) = doc.remove("db_name") {
                            doc.entry("database").or_insert(db_name);
                        }
                        for key in LEGACY_DROPPED_KEYS {
                            doc.remove(key);
                        }
                    },
                },
                ConfigStep {
                    version: 2,
                    name: "backup_settings",
                    apply: |doc| {
                        doc.entry("backup_dir").or_insert_with(|| Value::from("backups"));
                        doc.entry("backup_retention").or_insert_with(|| Value::from(7));
                    },
                },
            ],
        }
    }

    pub fn latest_version(&self) -> u32 {
        self.steps.last().map_or(0, |step| step.version)
    }

    /// Upgrades `document` in place and returns `(from, to)` versions.
    pub fn migrate(&self, document: &mut Value) -> Result<(u32, u32)> {
        let doc = document
            .as_object_mut()
            .ok_or_else(|| anyhow!("configuration must be a JSON object"))?;

        let from = match doc.get("config_version") {
            None => 0,
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| anyhow!("invalid config_version {}", value))?,
        };

        let mut current = from;
        for step in self.steps.iter().filter(|step| step.version > from) {
            tracing::debug!(version = step.version, name = step.name, "applying config migration");
            (step.apply)(doc);
            current = step.version;
            doc.insert("config_version".to_string(), Value::from(current));
        }

        Ok((from, current))
    }
}

impl Default for ConfigMigrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_document_is_upgraded() {
        let mut doc = json!({
            "app_version": "2.0.0",
            "db_version": 2,
            "db_name": "data/work_diary.db",
            "theme": "vista",
            "recent_records_limit": 50,
            "ui": { "title": "Diary", "geometry": "1000x650" },
            "main_tasks": ["Network"],
            "auto_update_check": true,
            "update_repo_url": "https://example.invalid"
        });

        let (from, to) = ConfigMigrator::new().migrate(&mut doc).unwrap();
        assert_eq!((from, to), (0, CONFIG_VERSION));

        let config: Config = serde_json::from_value(doc).unwrap();
        assert_eq!(config.database, PathBuf::from("data/work_diary.db"));
        assert_eq!(config.recent_records_limit, 50);
        assert_eq!(config.main_tasks, vec!["Network".to_string()]);
        assert_eq!(config.backup_retention, 7);
        assert_eq!(config.statuses.len(), 3);
    }

    #[test]
    fn current_document_is_untouched() {
        let mut doc = serde_json::to_value(Config::default()).unwrap();
        let before = doc.clone();
        let (from, to) = ConfigMigrator::new().migrate(&mut doc).unwrap();
        assert_eq!(from, to);
        assert_eq!(doc, before);
    }

    #[test]
    fn invalid_version_is_rejected() {
        for version in [json!(-1), json!(u64::from(u32::MAX) + 1), json!("2")] {
            let mut doc = json!({ "config_version": version });
            assert!(ConfigMigrator::new().migrate(&mut doc).is_err());
        }
    }

    #[test]
    fn non_object_document_is_rejected() {
        let mut doc = json!([1, 2, 3]);
        assert!(ConfigMigrator::new().migrate(&mut doc).is_err());
    }
}
