use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "fitness_tracker.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub log_file: PathBuf,
    pub log_level: String,
    pub chart_window: [f32; 2],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            log_file: PathBuf::from("fitness_logs.csv"),
            log_level: "warn".to_string(),
            chart_window: [1280.0, 800.0],
        }
    }
}

impl TrackerConfig {
    /// A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json_data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&json_data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(test)]
    pub fn for_log_file(log_file: impl Into<PathBuf>) -> Self {
        TrackerConfig {
            log_file: log_file.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.log_file, PathBuf::from("fitness_logs.csv"));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"log_file": "gym.csv"}"#).unwrap();
        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.log_file, PathBuf::from("gym.csv"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            TrackerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
