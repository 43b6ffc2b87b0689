//! Waybill configuration.
//!
//! Loaded from `~/.waybill/config.toml`. Every key is optional; a missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: usize = 20;

/// Waybill configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Operator recorded on new waypoints when `--as` and
    /// `WAYBILL_OPERATOR` are both absent.
    pub default_operator: Option<String>,

    /// Where the database lives. Defaults to `~/.waybill/`.
    pub storage_root: Option<PathBuf>,

    /// Rows per page in listings.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_operator: None,
            storage_root: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load config from `~/.waybill/config.toml`.
    ///
    /// Returns defaults if the file doesn't exist, and an error if it
    /// exists but can't be read or parsed.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.page_size == 0 {
            return Err(format!(
                "page-size must be at least 1 in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.waybill/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waybill/config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default-operator = \"night-shift\"\nstorage-root = \"/srv/waybill\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.default_operator.as_deref(), Some("night-shift"));
        assert_eq!(config.storage_root, Some(PathBuf::from("/srv/waybill")));
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "page-size = \"lots\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("invalid config"), "{err}");

        fs::write(&path, "page-size = 0").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("page-size"), "{err}");
    }
}
