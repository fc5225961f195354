//! Configuration loaded from `config/default.toml`.
//!
//! Missing files, sections, or keys fall back to defaults, so a bare
//! checkout works without any configuration at all.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GalleriaConfig {
    pub store: StoreConfig,
    pub backup: BackupConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file holding prompts and settings.
    pub path: PathBuf,
    /// Keep everything in memory for this run only.
    pub in_memory: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/galleria.db"),
            in_memory: false,
        }
    }
}

/// `[backup]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Prefix of backup file names: `<app_name>-backup-YYYY-MM-DD.json`.
    pub app_name: String,
    /// Directory exports are written to.
    pub dir: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            app_name: "galleria".into(),
            dir: PathBuf::from("backups"),
        }
    }
}

/// Load configuration from `path`, or defaults if the file does not exist.
///
/// A file that exists but does not parse is an error.
pub fn load_config(path: &Path) -> Result<GalleriaConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GalleriaConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GalleriaConfig::default());
        assert_eq!(config.store.path, PathBuf::from("data/galleria.db"));
        assert_eq!(config.backup.app_name, "galleria");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\npath = \"/var/lib/galleria.db\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/galleria.db"));
        assert!(!config.store.in_memory);
        assert_eq!(config.backup, BackupConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store\npath = 3").unwrap();

        assert!(load_config(&path).is_err());
    }
}
