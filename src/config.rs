//! Project configuration for layout roots.
//!
//! Configuration is a small TOML file:
//!
//! ```toml
//! root = "data"
//! database_dir = "db"
//! ```
//!
//! [`ShelfConfig::load_or_default`] mirrors the usual lookup chain: an
//! explicit path argument, then the `SHELF_CONFIG` environment variable,
//! then `shelf.toml` in the working directory, falling back to defaults
//! when no file exists.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ShelfResult;

pub const DEFAULT_CONFIG_PATH: &str = "shelf.toml";

fn default_root() -> PathBuf {
    PathBuf::from("data")
}

/// Project-level settings consumed by the layout builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// Base directory rooted layouts resolve beneath.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Directory under `root` reserved for standalone database files.
    #[serde(default)]
    pub database_dir: Option<String>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            database_dir: None,
        }
    }
}

impl ShelfConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ShelfResult<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Load configuration from the usual lookup chain, falling back to
    /// defaults when no file is present. A file that exists but fails to
    /// parse is still an error.
    pub fn load_or_default(path: Option<&str>) -> ShelfResult<Self> {
        let config_path = path
            .map(|p| p.to_string())
            .or_else(|| std::env::var("SHELF_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&config_path).exists() {
            log::debug!("no configuration at '{}', using defaults", config_path);
            return Ok(Self::default());
        }
        match Self::load(&config_path) {
            Ok(config) => Ok(config),
            Err(err) => {
                log::error!("failed to load configuration from '{}': {}", config_path, err);
                Err(err)
            }
        }
    }

    /// Directory standalone databases resolve beneath.
    pub fn database_root(&self) -> PathBuf {
        match &self.database_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_for_missing_fields() {
        let config: ShelfConfig = toml::from_str("").unwrap();
        assert_eq!(config, ShelfConfig::default());
        assert_eq!(config.root, PathBuf::from("data"));
        assert_eq!(config.database_root(), PathBuf::from("data"));
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "root = \"warehouse\"").unwrap();
        writeln!(file, "database_dir = \"db\"").unwrap();

        let config = ShelfConfig::load(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("warehouse"));
        assert_eq!(config.database_root(), PathBuf::from("warehouse/db"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = ShelfConfig::load_or_default(path.to_str()).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.toml");
        std::fs::write(&path, "root = [not toml").unwrap();
        assert!(ShelfConfig::load_or_default(path.to_str()).is_err());
    }
}
