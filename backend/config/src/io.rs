//! Config loading: TOML file, then environment overrides.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::schema::Config;
use crate::validation::validate;

/// Load config from an optional TOML file, apply env overrides, validate.
///
/// A missing file is not an error; defaults apply. A present but malformed
/// file is.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(p) if p.exists() => {
            let raw = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read config file {}", p.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", p.display()))?
        }
        _ => Config::default(),
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    debug!(port = config.server.port, db = %config.database.path, "config loaded");
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(bind) = std::env::var("PONDO_BIND") {
        config.server.bind_address = bind;
    }
    if let Some(port) = std::env::var("PONDO_PORT").ok().and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Ok(path) = std::env::var("PONDO_DB") {
        config.database.path = path;
    }
    if let Ok(key) = std::env::var("OCRSPACE_API_KEY") {
        config.providers.ocrspace_api_key = Some(key);
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        config.providers.gemini_api_key = Some(key);
    }
    if let Ok(model) = std::env::var("GEMINI_MODEL") {
        config.providers.gemini_model = Some(model);
    }
    if let Ok(url) = std::env::var("PONDO_RATES_URL") {
        config.rates.base_url = Some(url);
    }
    if let Ok(level) = std::env::var("PONDO_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(dir) = std::env::var("PONDO_LOG_DIR") {
        config.logging.dir = dir;
    }
}
