use crate::catalog::Catalog;
use crate::config::{load_global_settings, load_settings_from, Settings};
use crate::pipeline::Pipeline;
use crate::recipe::deserialize_pipeline;
use std::fs;
use std::path::{Path, PathBuf};

/// Pulls the global `--config <path>` option out of `args`, wherever it appears.
pub fn split_config_flag(args: Vec<String>) -> Result<(Option<PathBuf>, Vec<String>), String> {
    let mut config_path = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let value = iter
                .next()
                .ok_or_else(|| "missing value for `--config`".to_string())?;
            config_path = Some(PathBuf::from(value));
        } else {
            rest.push(arg);
        }
    }
    Ok((config_path, rest))
}

pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, String> {
    match config_path {
        Some(path) => load_settings_from(path),
        None => load_global_settings(),
    }
    .map_err(|err| err.to_string())
}

pub fn load_recipe_file(catalog: &Catalog, path: &Path) -> Result<Pipeline, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("failed to read recipe {}: {err}", path.display()))?;
    deserialize_pipeline(catalog, &text)
        .map_err(|err| format!("failed to import recipe {}: {err}", path.display()))
}
