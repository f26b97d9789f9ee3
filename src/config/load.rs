use super::{default_global_config_path, ConfigError, Settings};
use std::path::Path;

/// Loads `$HOME/.cipherflow/config.yaml`, falling back to defaults when it does not exist.
pub fn load_global_settings() -> Result<Settings, ConfigError> {
    let path = default_global_config_path()?;
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_settings_from(&path)
}

/// Loads an explicitly named settings file, which must exist.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Settings::from_path(path)?;
    settings.validate()?;
    Ok(settings)
}
