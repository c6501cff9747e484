use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::model::{is_supported_year, FIRST_YEAR, LAST_YEAR};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SAHIE_CONFIG";
/// Environment variable overriding the database path.
pub const DB_ENV: &str = "SAHIE_DB";

/// Runtime settings of the dashboard.
///
/// ```json
/// { "database": "data/censusdata.db", "default_year": 2019, "export_dir": "exports" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite file populated by the census loader.
    pub database: PathBuf,
    /// Year preselected in the year dropdown.
    pub default_year: Option<i64>,
    /// Initial directory of the CSV export dialog.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from("censusdata.db"),
            default_year: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Settings from `$SAHIE_CONFIG` and `$SAHIE_DB`.
    ///
    /// An unreadable or invalid config file is logged and replaced by the
    /// defaults; `$SAHIE_DB` applies either way.
    pub fn load() -> Self {
        Self::resolve_lenient(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os(DB_ENV).map(PathBuf::from),
        )
    }

    /// Read `config_file` if given, then apply the database override.
    pub fn resolve(config_file: Option<&Path>, database: Option<PathBuf>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        Ok(config.with_database(database))
    }

    pub fn resolve_lenient(config_file: Option<PathBuf>, database: Option<PathBuf>) -> Self {
        let config = match Self::resolve(config_file.as_deref(), database.clone()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("invalid configuration, using defaults: {e:#}");
                Config::default().with_database(database)
            }
        };
        log::debug!("config: {config:?}");
        config
    }

    fn with_database(mut self, database: Option<PathBuf>) -> Self {
        if let Some(db) = database {
            self.database = db;
        }
        self
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(year) = self.default_year {
            if !is_supported_year(year) {
                bail!("default_year {year} is outside {FIRST_YEAR}-{LAST_YEAR}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, PathBuf::from("censusdata.db"));
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_json(
            r#"{ "database": "/tmp/sahie.db", "default_year": 2019, "export_dir": "out" }"#,
        )
        .unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/sahie.db"));
        assert_eq!(config.default_year, Some(2019));
        assert_eq!(config.export_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn rejects_bad_year_and_unknown_keys() {
        assert!(Config::from_json(r#"{ "default_year": 2030 }"#).is_err());
        assert!(Config::from_json(r#"{ "databse": "x.db" }"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sahie.json");
        std::fs::write(&path, r#"{ "database": "cache.db" }"#).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().database, PathBuf::from("cache.db"));
        assert!(Config::from_file(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn database_override_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sahie.json");
        std::fs::write(&path, r#"{ "database": "cache.db", "default_year": 2015 }"#).unwrap();

        let config = Config::resolve(Some(&path), Some("override.db".into())).unwrap();
        assert_eq!(config.database, PathBuf::from("override.db"));
        assert_eq!(config.default_year, Some(2015));
    }

    #[test]
    fn invalid_config_file_keeps_database_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sahie.json");
        std::fs::write(&path, r#"{ "default_year": 1999 }"#).unwrap();
        assert!(Config::resolve(Some(&path), Some("override.db".into())).is_err());

        let config = Config::resolve_lenient(Some(path), Some("override.db".into()));
        assert_eq!(config.database, PathBuf::from("override.db"));
        assert_eq!(config.default_year, None);

        let missing = dir.path().join("nope.json");
        assert_eq!(Config::resolve_lenient(Some(missing), None), Config::default());
    }
}
