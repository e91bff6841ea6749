//! Report command - render a saved analysis record

use crate::models::AnalysisRecord;
use crate::overlay::{apply_overlay, RecordPatch};
use crate::report::{self, OutputFormat};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn run(
    record_path: &Path,
    format: &str,
    edits: Option<&Path>,
    output: Option<&Path>,
    respect_preferences: bool,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let record = AnalysisRecord::load(record_path)?;
    let patch = match edits {
        Some(path) => RecordPatch::load(path)?,
        None => RecordPatch::default(),
    };
    let merged = apply_overlay(&record, &patch);

    let rendered = if respect_preferences {
        let store = super::open_settings()?;
        report::render_with_preferences(
            Some(&*merged),
            format,
            &store.settings().report_preferences,
        )
    } else {
        report::render(Some(&*merged), format)
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}Report written to: {}",
                style("📄 ").bold(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
