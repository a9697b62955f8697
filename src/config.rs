use crate::constants::{
    DEFAULT_CSV_OUTPUT_PATH, DEFAULT_DB_PATH, DEFAULT_LOG_PATH, DEFAULT_RATE_TABLE_PATH,
    DEFAULT_SOURCE_URL, DEFAULT_TABLE_NAME,
};
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for a single ETL run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Page holding the bank table to scrape.
    pub source_url: String,
    /// CSV with `Currency` and `Rate` columns (target currency per USD).
    pub rate_table_path: PathBuf,
    /// Flat-file sink, overwritten each run.
    pub csv_output_path: PathBuf,
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Table replaced each run.
    pub table_name: String,
    /// Append-only progress log.
    pub log_path: PathBuf,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            rate_table_path: PathBuf::from(DEFAULT_RATE_TABLE_PATH),
            csv_output_path: PathBuf::from(DEFAULT_CSV_OUTPUT_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl EtlConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: EtlConfig = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`EtlConfig::load`], but falls back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!("No config file at {}, using defaults", path.as_ref().display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(EtlError::Config("table_name must not be empty".into()));
        }
        // Table name is spliced into the read-back queries unquoted
        if !self
            .table_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(EtlError::Config(format!(
                "table_name '{}' may only contain ASCII letters, digits and '_'",
                self.table_name
            )));
        }
        if self.source_url.trim().is_empty() {
            return Err(EtlError::Config("source_url must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banks_etl.toml");
        fs::write(&path, "table_name = \"Banks_2023\"\ndb_path = \"/tmp/other.db\"\n").unwrap();

        let config = EtlConfig::load(&path).unwrap();
        assert_eq!(config.table_name, "Banks_2023");
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = EtlConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EtlConfig::default());
    }

    #[test]
    fn test_missing_file_is_config_error_on_strict_load() {
        let dir = tempdir().unwrap();
        let err = EtlConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_empty_table_name_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banks_etl.toml");
        fs::write(&path, "table_name = \"  \"\n").unwrap();

        let err = EtlConfig::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_table_name_with_sql_rejected() {
        let config = EtlConfig {
            table_name: "banks; DROP TABLE x".into(),
            ..EtlConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banks_etl.toml");
        fs::write(&path, "table_name = [unterminated").unwrap();

        let err = EtlConfig::load(&path).unwrap_err();
        assert!(matches!(err, EtlError::Toml(_)));
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
