//! Settings and config commands

use super::{ConfigAction, SettingsAction};
use crate::config::{JsonFileBackend, Settings, UserConfig};
use anyhow::Result;
use console::style;

pub fn run(action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let store = super::open_settings()?;
            print_settings(store.settings())
        }
        SettingsAction::Set { key, value } => {
            let mut store = super::open_settings()?;
            store.set(&key, &value)?;
            println!(
                "{} Set {} in {}",
                style("✓").green(),
                style(&key).bold(),
                store.backend().path().display()
            );
            Ok(())
        }
        SettingsAction::Reset => {
            let mut store = super::open_settings()?;
            store.reset()?;
            println!("{} Settings restored to defaults", style("✓").green());
            Ok(())
        }
        SettingsAction::Path => {
            println!("{}", JsonFileBackend::default_location()?.path().display());
            Ok(())
        }
    }
}

/// Settings as JSON, with the API key masked.
fn print_settings(settings: &Settings) -> Result<()> {
    let mut shown = settings.clone();
    if shown.api_settings.has_api_key() {
        shown.api_settings.api_key = mask(&shown.api_settings.api_key);
    }
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

fn mask(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}

pub fn run_config_action(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to point at your analysis service:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export CREDITLENS_ANALYZE_URL=\"http://127.0.0.1:8000/analyze\"");
            Ok(())
        }
        ConfigAction::Show => show_config(),
    }
}

fn show_config() -> Result<()> {
    let config = UserConfig::load()?;
    println!("📁 Config paths:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() { "✓" } else { "(not found)" };
        println!("  Config:   {} {}", user_path.display(), status);
    }
    let settings_path = JsonFileBackend::default_location()?;
    let status = if settings_path.path().exists() {
        "✓"
    } else {
        "(defaults)"
    };
    println!("  Settings: {} {}", settings_path.path().display(), status);
    println!();

    let endpoints = config.endpoints();
    println!("🌐 Endpoints:");
    println!("  Analyze:     {}", endpoints.analyze_url);
    println!("  Word export: {}", endpoints.word_export_url);
    println!("  Simplify:    {}", endpoints.simplify_url);
    println!("  Timeout:     {}s", endpoints.timeout.as_secs());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("gsk_abcdef1234"), "****1234");
        assert_eq!(mask("ab"), "****ab");
    }
}
