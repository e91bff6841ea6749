//! Analyst settings: risk thresholds, report sections, model and API key
//!
//! Settings keep the JSON shape the analysis service expects (camelCase
//! keys), since the whole object is posted alongside every upload. The
//! store loads once at startup and rewrites the full object on every update.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Models offered by the analysis service.
pub const KNOWN_MODELS: &[&str] = &[
    DEFAULT_MODEL,
    "mixtral-8x7b-32768",
    "llama2-70b-4096",
    "llama3-70b-8192",
    "gemma-7b-it",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,
    #[serde(default)]
    pub report_preferences: ReportPreferences,
    #[serde(default)]
    pub api_settings: ApiSettings,
}

/// Limits past which a ratio counts against the borrower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskThresholds {
    /// Minimum acceptable current ratio.
    pub liquidity_ratio: f64,
    /// Maximum acceptable debt-to-equity.
    pub debt_to_equity: f64,
    /// Minimum acceptable net profit margin, in percent.
    pub net_profit_margin: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            liquidity_ratio: 1.0,
            debt_to_equity: 2.5,
            net_profit_margin: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportPreferences {
    #[serde(rename = "include5Cs")]
    pub include_5cs: bool,
    pub include_risk_assessment: bool,
    pub include_executive_summary: bool,
}

impl Default for ReportPreferences {
    fn default() -> Self {
        Self {
            include_5cs: true,
            include_risk_assessment: true,
            include_executive_summary: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    pub model: String,
    /// Blank means the service uses its own environment key.
    pub api_key: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

impl ApiSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Sections to replace. Each present section replaces the current one
/// wholesale; absent sections are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_thresholds: Option<RiskThresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_preferences: Option<ReportPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_settings: Option<ApiSettings>,
}

impl Settings {
    /// Shallow merge: sections present in `patch` replace ours.
    pub fn merged(&self, patch: SettingsPatch) -> Settings {
        Settings {
            risk_thresholds: patch.risk_thresholds.unwrap_or(self.risk_thresholds),
            report_preferences: patch.report_preferences.unwrap_or(self.report_preferences),
            api_settings: patch
                .api_settings
                .unwrap_or_else(|| self.api_settings.clone()),
        }
    }

    /// Build a patch that changes one field, addressed as `section.field`
    /// using the JSON names (e.g. `riskThresholds.liquidityRatio`).
    pub fn patch_for(&self, key: &str, value: &str) -> Result<SettingsPatch> {
        let (section, field) = key
            .split_once('.')
            .with_context(|| format!("'{}' should look like section.field", key))?;

        let mut patch = SettingsPatch::default();
        match section {
            "riskThresholds" => {
                let mut thresholds = self.risk_thresholds;
                let number: f64 = value
                    .parse()
                    .with_context(|| format!("'{}' is not a number", value))?;
                if !number.is_finite() {
                    bail!("'{}' is not a finite number", value);
                }
                match field {
                    "liquidityRatio" => thresholds.liquidity_ratio = number,
                    "debtToEquity" => thresholds.debt_to_equity = number,
                    "netProfitMargin" => thresholds.net_profit_margin = number,
                    _ => bail!("Unknown risk threshold '{}'", field),
                }
                patch.risk_thresholds = Some(thresholds);
            }
            "reportPreferences" => {
                let mut prefs = self.report_preferences;
                let flag: bool = value
                    .parse()
                    .with_context(|| format!("'{}' is not true or false", value))?;
                match field {
                    "include5Cs" => prefs.include_5cs = flag,
                    "includeRiskAssessment" => prefs.include_risk_assessment = flag,
                    "includeExecutiveSummary" => prefs.include_executive_summary = flag,
                    _ => bail!("Unknown report preference '{}'", field),
                }
                patch.report_preferences = Some(prefs);
            }
            "apiSettings" => {
                let mut api = self.api_settings.clone();
                match field {
                    "model" => {
                        if !KNOWN_MODELS.contains(&value) {
                            tracing::warn!("model '{}' is not one of the known service models", value);
                        }
                        api.model = value.to_string();
                    }
                    "apiKey" => api.api_key = value.to_string(),
                    _ => bail!("Unknown API setting '{}'", field),
                }
                patch.api_settings = Some(api);
            }
            _ => bail!(
                "Unknown settings section '{}'. Valid sections: riskThresholds, reportPreferences, apiSettings",
                section
            ),
        }
        Ok(patch)
    }
}

/// Durable storage for the settings object.
pub trait SettingsBackend {
    /// Stored settings, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Settings>>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `settings.json` in the creditlens config directory.
    pub fn default_location() -> Result<Self> {
        let dir = super::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::new(dir.join(super::SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid settings JSON", self.path.display()))?;
        Ok(Some(settings))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process storage holding the serialized JSON, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: RefCell<Option<String>>,
}

impl MemoryBackend {
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            stored: RefCell::new(Some(json.into())),
        }
    }

    pub fn stored_json(&self) -> Option<String> {
        self.stored.borrow().clone()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Settings>> {
        match self.stored.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.stored.borrow_mut() = Some(serde_json::to_string(settings)?);
        Ok(())
    }
}

/// Current settings plus the backend they persist to. One writer per process.
pub struct SettingsStore<B: SettingsBackend> {
    backend: B,
    current: Settings,
}

impl<B: SettingsBackend> SettingsStore<B> {
    /// Load stored settings, falling back to defaults when none are saved
    /// or the stored copy is unreadable.
    pub fn open(backend: B) -> Self {
        let current = match backend.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("ignoring stored settings: {:#}", e);
                Settings::default()
            }
        };
        Self { backend, current }
    }

    pub fn settings(&self) -> &Settings {
        &self.current
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Merge `patch` over the current settings and persist the result.
    pub fn update(&mut self, patch: SettingsPatch) -> Result<&Settings> {
        let updated = self.current.merged(patch);
        self.backend.save(&updated)?;
        self.current = updated;
        tracing::debug!("settings saved");
        Ok(&self.current)
    }

    /// Set one field by dotted key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&Settings> {
        let patch = self.current.patch_for(key, value)?;
        self.update(patch)
    }

    /// Restore defaults and persist them.
    pub fn reset(&mut self) -> Result<&Settings> {
        let defaults = Settings::default();
        self.backend.save(&defaults)?;
        self.current = defaults;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.risk_thresholds.liquidity_ratio, 1.0);
        assert_eq!(settings.risk_thresholds.debt_to_equity, 2.5);
        assert_eq!(settings.risk_thresholds.net_profit_margin, 5.0);
        assert!(settings.report_preferences.include_5cs);
        assert_eq!(settings.api_settings.model, DEFAULT_MODEL);
        assert!(!settings.api_settings.has_api_key());
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["riskThresholds"]["liquidityRatio"], 1.0);
        assert_eq!(json["reportPreferences"]["include5Cs"], true);
        assert_eq!(json["reportPreferences"]["includeExecutiveSummary"], true);
        assert_eq!(json["apiSettings"]["apiKey"], "");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"riskThresholds": {"debtToEquity": 3.0}}"#).unwrap();
        assert_eq!(settings.risk_thresholds.debt_to_equity, 3.0);
        assert_eq!(settings.risk_thresholds.liquidity_ratio, 1.0);
        assert!(settings.report_preferences.include_risk_assessment);
    }

    #[test]
    fn test_open_without_stored_uses_defaults() {
        let store = SettingsStore::open(MemoryBackend::default());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_open_with_corrupt_store_uses_defaults() {
        let store = SettingsStore::open(MemoryBackend::with_json("{not json"));
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_update_merges_shallowly_and_persists() {
        let mut store = SettingsStore::open(MemoryBackend::default());
        let patch = SettingsPatch {
            api_settings: Some(ApiSettings {
                model: "gemma-7b-it".into(),
                api_key: "gsk_test".into(),
            }),
            ..Default::default()
        };
        store.update(patch).unwrap();

        assert_eq!(store.settings().api_settings.model, "gemma-7b-it");
        assert_eq!(store.settings().risk_thresholds, RiskThresholds::default());

        let persisted: Settings =
            serde_json::from_str(&store.backend().stored_json().unwrap()).unwrap();
        assert_eq!(&persisted, store.settings());
    }

    #[test]
    fn test_set_dotted_key() {
        let mut store = SettingsStore::open(MemoryBackend::default());
        store.set("riskThresholds.liquidityRatio", "1.2").unwrap();
        store.set("reportPreferences.include5Cs", "false").unwrap();
        assert_eq!(store.settings().risk_thresholds.liquidity_ratio, 1.2);
        assert_eq!(store.settings().risk_thresholds.debt_to_equity, 2.5);
        assert!(!store.settings().report_preferences.include_5cs);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut store = SettingsStore::open(MemoryBackend::default());
        assert!(store.set("riskThresholds.liquidityRatio", "high").is_err());
        assert!(store.set("riskThresholds.quickRatio", "1").is_err());
        assert!(store.set("theme.dark", "true").is_err());
        assert!(store.set("nodot", "1").is_err());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_non_finite_threshold_keeps_stored_settings() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("settings.json"));
        let mut store = SettingsStore::open(backend.clone());
        store.set("apiSettings.apiKey", "gsk_keep_me").unwrap();

        for value in ["inf", "-inf", "NaN", "infinity"] {
            assert!(store.set("riskThresholds.liquidityRatio", value).is_err());
        }
        assert_eq!(store.settings().risk_thresholds.liquidity_ratio, 1.0);

        let mut reopened = SettingsStore::open(backend);
        assert_eq!(reopened.settings().api_settings.api_key, "gsk_keep_me");
        reopened.set("apiSettings.model", DEFAULT_MODEL).unwrap();
        assert_eq!(reopened.settings().api_settings.api_key, "gsk_keep_me");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = SettingsStore::open(MemoryBackend::default());
        store.set("apiSettings.apiKey", "gsk_x").unwrap();
        store.reset().unwrap();
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_json_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("settings.json"));
        assert!(backend.load().unwrap().is_none());

        let mut store = SettingsStore::open(backend.clone());
        store.set("riskThresholds.netProfitMargin", "7.5").unwrap();

        let reopened = SettingsStore::open(backend);
        assert_eq!(reopened.settings().risk_thresholds.net_profit_margin, 7.5);
    }
}
