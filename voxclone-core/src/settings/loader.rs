use crate::settings::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load settings from a TOML file, then overlay the process environment.
/// A missing file yields the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => load_from_file(path)?,
        None => Settings::default(),
    };
    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

/// Parse a settings file without consulting the environment.
pub fn load_from_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        tracing::info!("Settings file {path:?} not found, using defaults");
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {path:?}"))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse settings in {path:?}"))
}
