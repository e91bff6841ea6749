//! Configuration module for creditlens
//!
//! This module handles:
//! - Analyst settings (settings.json): risk thresholds, report sections, model
//! - Service endpoints (config.toml plus environment overrides)

mod endpoints;
mod settings;

pub use endpoints::{
    EndpointConfig, Endpoints, UserConfig, DEFAULT_ANALYZE_URL, DEFAULT_SIMPLIFY_URL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WORD_EXPORT_URL,
};
pub use settings::{
    ApiSettings, JsonFileBackend, MemoryBackend, ReportPreferences, RiskThresholds, Settings,
    SettingsBackend, SettingsPatch, SettingsStore, DEFAULT_MODEL, KNOWN_MODELS,
};

use std::path::PathBuf;

/// Overrides the config directory; used by tests and sandboxed runs.
pub const CONFIG_DIR_ENV: &str = "CREDITLENS_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";
const SETTINGS_FILE: &str = "settings.json";

/// Directory holding `config.toml` and `settings.json`.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|p| p.join("creditlens")),
    }
}
