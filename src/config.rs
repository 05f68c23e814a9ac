use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "BIKESHARE_DATA_DIR";
pub const LOG_FILE_VAR: &str = "LOG_FILE_PATH";

const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_LOG_FILE: &str = "logs/bikeshare_explorer.log";

/// Runtime settings, read from the environment (and `.env`, if loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Directory holding `chicago.csv`, `new_york_city.csv` and `washington.csv`.
    pub data_dir: PathBuf,
    pub log_file_path: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl ExplorerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        ExplorerConfig {
            data_dir: get(DATA_DIR_VAR).unwrap_or(defaults.data_dir),
            log_file_path: get(LOG_FILE_VAR).unwrap_or(defaults.log_file_path),
        }
    }

    /// Replaces the data directory when one was given on the command line.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}
