//! Analyze command - upload a PDF and save the analysis record

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub fn run(pdf: &Path, output: &Path) -> Result<()> {
    if !pdf.is_file() {
        anyhow::bail!("PDF not found: {}", pdf.display());
    }

    let settings = super::open_settings()?;
    let client = super::service_client()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(create_spinner_style()?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Analyzing {} with {}...",
        pdf.display(),
        settings.settings().api_settings.model
    ));

    let result = client.analyze(pdf, settings.settings());
    spinner.finish_and_clear();

    // Nothing is written unless the service returned a usable record.
    let record = result.with_context(|| {
        format!(
            "Failed to analyze document. Is the analysis service running at {}?",
            client.endpoints().analyze_url
        )
    })?;

    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let pages = record
        .metadata
        .as_ref()
        .and_then(|m| m.pages_analyzed)
        .unwrap_or(0);
    println!(
        "{} Analysis saved to {} ({} pages analyzed)",
        style("✓").green(),
        style(output.display()).cyan(),
        pages
    );
    println!(
        "\nNext: {}",
        style(format!("creditlens report {}", output.display())).bold()
    );
    Ok(())
}

/// Create spinner progress style
fn create_spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")?)
}
