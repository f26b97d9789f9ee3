use super::ConfigError;
use crate::engine::ExecutionLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub auto_run: bool,
    #[serde(default)]
    pub max_input_bytes: Option<usize>,
    #[serde(default = "default_true")]
    pub pretty_recipes: bool,
    #[serde(default)]
    pub run_log: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_run: true,
            max_input_bytes: None,
            pretty_recipes: true,
            run_log: None,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == Some(0) {
            return Err(ConfigError::Settings(
                "`max_input_bytes` must be greater than zero".to_string(),
            ));
        }
        if self
            .run_log
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::Settings(
                "`run_log` must be a non-empty path".to_string(),
            ));
        }
        Ok(())
    }

    pub fn execution_limits(&self) -> ExecutionLimits {
        ExecutionLimits {
            max_input_bytes: self.max_input_bytes,
        }
    }
}

fn default_true() -> bool {
    true
}
