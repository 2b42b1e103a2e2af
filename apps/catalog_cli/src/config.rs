use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context, Result};
use client_core::{DEFAULT_API_URL, DEFAULT_SEARCH_DEBOUNCE};
use serde::Deserialize;
use tracing::warn;
use url::Url;
use view::{parse_page_size, DEFAULT_PAGE_SIZE};

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub page_size: usize,
    pub search_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    page_size: Option<usize>,
    search_debounce_ms: Option<u64>,
}

pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    load_settings_from(path, config_path.is_some(), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment variables. The `APP__*`
/// spelling wins over the `CATALOG_*` one when both are set.
pub fn load_settings_from(
    path: &Path,
    file_required: bool,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            if let Some(v) = file_cfg.api_url {
                settings.api_url = v;
            }
            if let Some(v) = file_cfg.page_size {
                settings.page_size = v;
            }
            if let Some(v) = file_cfg.search_debounce_ms {
                settings.search_debounce_ms = v;
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound && !file_required => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    if let Some(v) = lookup(&env, "CATALOG_API_URL", "APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = lookup(&env, "CATALOG_PAGE_SIZE", "APP__PAGE_SIZE") {
        settings.page_size = parse_page_size(&v)?;
    }

    if let Some(v) = lookup(&env, "CATALOG_SEARCH_DEBOUNCE_MS", "APP__SEARCH_DEBOUNCE_MS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.search_debounce_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring unparsable search debounce"),
        }
    }

    validate(&settings)?;
    Ok(settings)
}

fn lookup(env: &impl Fn(&str) -> Option<String>, legacy: &str, key: &str) -> Option<String> {
    env(key).or_else(|| env(legacy))
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.page_size == 0 {
        bail!(shared::error::CatalogError::InvalidConfig(
            "page size must be a positive integer".into()
        ));
    }
    Url::parse(&settings.api_url)
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
