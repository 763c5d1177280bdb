//! Configuration loading and management
//!
//! Handles parsing of the `.todo.toml` file in the data directory, and
//! resolution of the data directory itself.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::model::SortField;

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = ".todo.toml";

/// Fallback data directory when no platform directory is available
const FALLBACK_HOME: &str = ".todo";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Query defaults
    #[serde(default)]
    pub query: QueryConfig,
}

/// Where tasks and users live on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Task file, relative to the data directory
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,

    /// User file, relative to the data directory
    #[serde(default = "default_users_file")]
    pub users_file: String,

    /// How long a mutation waits for the file lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_tasks_file() -> String {
    "todos.json".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            users_file: default_users_file(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Sort field used by `todo list` when `--sort` is absent
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_sort() -> String {
    SortField::CreatedAt.as_str().to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
        }
    }
}

impl QueryConfig {
    pub fn sort_field(&self) -> SortField {
        SortField::from_name(&self.default_sort)
    }
}

impl Config {
    /// Load configuration from a `.todo.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.todo.toml` from the data directory.
    ///
    /// A missing file yields defaults. A file that fails to parse or
    /// validate is `InvalidConfig`, prefixed with its path.
    pub fn load_from_dir(home: &Path) -> crate::error::Result<Self> {
        let config_path = home.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path).map_err(|err| match err {
            crate::error::Error::InvalidConfig(msg) => {
                crate::error::Error::InvalidConfig(format!("{}: {msg}", config_path.display()))
            }
            crate::error::Error::TomlParse(parse) => crate::error::Error::InvalidConfig(format!(
                "{}: {parse}",
                config_path.display()
            )),
            other => other,
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn tasks_path(&self, home: &Path) -> PathBuf {
        home.join(&self.storage.tasks_file)
    }

    pub fn users_path(&self, home: &Path) -> PathBuf {
        home.join(&self.storage.users_file)
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        if SortField::parse_known(&self.query.default_sort).is_none() {
            return Err(crate::error::Error::InvalidConfig(format!(
                "query.default_sort: unknown field '{}' (expected priority|dueAt|createdAt)",
                self.query.default_sort
            )));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        validate_file_name(&self.tasks_file, "storage.tasks_file")?;
        validate_file_name(&self.users_file, "storage.users_file")?;
        if self.tasks_file.trim() == self.users_file.trim() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.tasks_file and storage.users_file must differ".to_string(),
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> crate::error::Result<()> {
    if name.trim().is_empty() {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: file name cannot be empty"
        )));
    }
    if name.trim() == CONFIG_FILE {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: cannot reuse {CONFIG_FILE}"
        )));
    }
    Ok(())
}

/// Resolve the data directory.
///
/// Order: explicit path (`--home` / `TODO_HOME`), then the platform data
/// directory, then `./.todo`.
pub fn resolve_home(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    directories::ProjectDirs::from("", "", "todo")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_HOME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.tasks_file, "todos.json");
        assert_eq!(cfg.storage.users_file, "users.json");
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
        assert_eq!(cfg.query.default_sort, "createdAt");
        assert_eq!(cfg.query.sort_field(), SortField::CreatedAt);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
tasks_file = "tasks.json"
users_file = "accounts.json"
lock_timeout_ms = 250

[query]
default_sort = "dueDate"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.tasks_file, "tasks.json");
        assert_eq!(cfg.storage.users_file, "accounts.json");
        assert_eq!(cfg.storage.lock_timeout_ms, 250);
        assert_eq!(cfg.query.sort_field(), SortField::DueAt);
        assert_eq!(cfg.tasks_path(dir.path()), dir.path().join("tasks.json"));
        assert_eq!(cfg.users_path(dir.path()), dir.path().join("accounts.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[query]\ndefault_sort = \"priority\"").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.query.sort_field(), SortField::Priority);
        assert_eq!(cfg.storage.tasks_file, "todos.json");
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);

        for content in [
            "[storage]\nlock_timeout_ms = 0",
            "[storage]\ntasks_file = \"\"",
            "[storage]\ntasks_file = \"same.json\"\nusers_file = \"same.json\"",
            "[query]\ndefault_sort = \"title\"",
        ] {
            fs::write(&path, content).expect("write config");
            let err = Config::load(&path).expect_err("invalid config");
            match err {
                crate::error::Error::InvalidConfig(_) => {}
                other => panic!("unexpected error for {content:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path()).expect("defaults");
        assert_eq!(cfg.storage.tasks_file, "todos.json");
    }

    #[test]
    fn load_from_dir_rejects_bad_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "[storage\ntasks_file = 1").expect("write config");

        let err = Config::load_from_dir(dir.path()).expect_err("broken toml");
        assert!(matches!(err, crate::error::Error::InvalidConfig(_)));
        assert_eq!(err.exit_code(), crate::error::exit_codes::USER_ERROR);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("tasks_file = \"todos.json\""));
        assert!(written.contains("default_sort = \"createdAt\""));
    }

    #[test]
    fn explicit_home_wins() {
        let explicit = PathBuf::from("/tmp/todo-home");
        assert_eq!(resolve_home(Some(&explicit)), explicit);
    }
}
