use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "exoplanet-explorer.toml";

pub const DEFAULT_DATASET: &str = "shivamb/all-exoplanets-dataset";
pub const DEFAULT_KAGGLE_URL: &str = "https://www.kaggle.com/api/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Runtime settings. Every field has a default, so an empty or missing
/// config file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the cache file.
    pub data_dir: PathBuf,
    /// Cache file name inside `data_dir`.
    pub cache_file: String,
    /// Kaggle dataset handle, `owner/slug`.
    pub dataset: String,
    pub kaggle_base_url: String,
    /// HTTP timeout for the one-time download. `None` waits indefinitely.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_file: "exoplanets.csv".to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            kaggle_base_url: DEFAULT_KAGGLE_URL.to_string(),
            fetch_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load `exoplanet-explorer.toml` if present, then apply environment
    /// overrides. A broken file is reported and defaults are used instead.
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            match Self::from_file(path) {
                Ok(c) => {
                    log::info!("Using configuration from {}", path.display());
                    c
                }
                Err(e) => {
                    log::error!("{e}; falling back to defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from `EXOPLANET_*` variables as resolved by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("EXOPLANET_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dataset) = lookup("EXOPLANET_DATASET") {
            self.dataset = dataset;
        }
        if let Some(url) = lookup("EXOPLANET_KAGGLE_URL") {
            self.kaggle_base_url = url;
        }
    }

    /// Fixed location of the cached dataset.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(&self.cache_file)
    }
}
