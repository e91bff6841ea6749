//! Service endpoint configuration for creditlens
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/creditlens/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ANALYZE_URL: &str = "http://127.0.0.1:8000/analyze";
pub const DEFAULT_WORD_EXPORT_URL: &str =
    "https://huggingface.co/spaces/giz17/Wizcoders-Mclaren-Orix-Hackathon/download/word";
pub const DEFAULT_SIMPLIFY_URL: &str = "http://127.0.0.1:8000/api/simplify";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Multipart upload endpoint returning the analysis record
    pub analyze_url: Option<String>,

    /// Remote Word (.docx) conversion endpoint
    pub word_export_url: Option<String>,

    /// Plain-language rewrite endpoint
    pub simplify_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Fully resolved endpoints, every field filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub analyze_url: String,
    pub word_export_url: String,
    pub simplify_url: String,
    pub timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        UserConfig::default().endpoints()
    }
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/creditlens/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| toml::from_str::<UserConfig>(&content).map_err(Into::into))
            {
                Ok(user_config) => config.merge(user_config),
                Err(e) => tracing::warn!("ignoring {}: {}", path.display(), e),
            }
        }

        // Environment variables override everything
        if let Ok(url) = std::env::var("CREDITLENS_ANALYZE_URL") {
            config.endpoints.analyze_url = Some(url);
        }
        if let Ok(url) = std::env::var("CREDITLENS_WORD_EXPORT_URL") {
            config.endpoints.word_export_url = Some(url);
        }
        if let Ok(url) = std::env::var("CREDITLENS_SIMPLIFY_URL") {
            config.endpoints.simplify_url = Some(url);
        }

        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        super::config_dir().map(|p| p.join(super::CONFIG_FILE))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.endpoints.analyze_url.is_some() {
            self.endpoints.analyze_url = other.endpoints.analyze_url;
        }
        if other.endpoints.word_export_url.is_some() {
            self.endpoints.word_export_url = other.endpoints.word_export_url;
        }
        if other.endpoints.simplify_url.is_some() {
            self.endpoints.simplify_url = other.endpoints.simplify_url;
        }
        if other.endpoints.timeout_secs.is_some() {
            self.endpoints.timeout_secs = other.endpoints.timeout_secs;
        }
    }

    /// Resolve every endpoint, filling gaps with the built-in defaults.
    pub fn endpoints(&self) -> Endpoints {
        let e = &self.endpoints;
        Endpoints {
            analyze_url: e
                .analyze_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ANALYZE_URL.to_string()),
            word_export_url: e
                .word_export_url
                .clone()
                .unwrap_or_else(|| DEFAULT_WORD_EXPORT_URL.to_string()),
            simplify_url: e
                .simplify_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SIMPLIFY_URL.to_string()),
            timeout: Duration::from_secs(e.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = format!(
                r#"# creditlens service configuration

[endpoints]
# Analysis service: multipart upload of the PDF plus settings JSON
# analyze_url = "{DEFAULT_ANALYZE_URL}"

# Word conversion: accepts the analysis record, returns a .docx
# word_export_url = "{DEFAULT_WORD_EXPORT_URL}"

# Plain-language rewrite
# simplify_url = "{DEFAULT_SIMPLIFY_URL}"

# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"#
            );
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = UserConfig::default().endpoints();
        assert_eq!(endpoints.analyze_url, DEFAULT_ANALYZE_URL);
        assert_eq!(endpoints.word_export_url, DEFAULT_WORD_EXPORT_URL);
        assert_eq!(endpoints.simplify_url, DEFAULT_SIMPLIFY_URL);
        assert_eq!(endpoints.timeout, Duration::from_secs(120));
        assert_eq!(Endpoints::default(), endpoints);
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[endpoints]
analyze_url = "http://analysis.internal/analyze"
timeout_secs = 30
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        let endpoints = config.endpoints();
        assert_eq!(endpoints.analyze_url, "http://analysis.internal/analyze");
        assert_eq!(endpoints.simplify_url, DEFAULT_SIMPLIFY_URL);
        assert_eq!(endpoints.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_toml_parsing_minimal() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert_eq!(config.endpoints(), Endpoints::default());
    }

    #[test]
    fn test_invalid_toml_does_not_crash() {
        let result = toml::from_str::<UserConfig>("this is [[ not valid toml {{{}}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overrides_set_fields() {
        let mut base = UserConfig::default();
        let other = UserConfig {
            endpoints: EndpointConfig {
                analyze_url: Some("http://a".to_string()),
                word_export_url: Some("http://w".to_string()),
                simplify_url: Some("http://s".to_string()),
                timeout_secs: Some(5),
            },
        };
        base.merge(other);
        let endpoints = base.endpoints();
        assert_eq!(endpoints.analyze_url, "http://a");
        assert_eq!(endpoints.word_export_url, "http://w");
        assert_eq!(endpoints.simplify_url, "http://s");
        assert_eq!(endpoints.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_merge_preserves_base_when_other_is_none() {
        let mut base = UserConfig {
            endpoints: EndpointConfig {
                analyze_url: Some("http://kept".to_string()),
                ..Default::default()
            },
        };
        base.merge(UserConfig::default());
        assert_eq!(base.endpoints().analyze_url, "http://kept");
    }
}
