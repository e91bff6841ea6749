//! Credit memo report synthesis
//!
//! Supports two output formats:
//! - `markdown` - the `credit_memo.md` download
//! - `html` - Word-compatible HTML (saved as `.doc`, or posted for `.docx` conversion)
//!
//! Both renderers are pure: no IO, no clock, identical output for identical
//! input. Field fallbacks live in [`fields`] so the two formats cannot drift.

pub mod fields;
pub mod markdown;
pub mod word;

use crate::config::ReportPreferences;
use crate::models::AnalysisRecord;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    WordHtml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" | "word" | "doc" => Ok(OutputFormat::WordHtml),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: markdown, html",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::WordHtml => write!(f, "html"),
        }
    }
}

/// Which optional sections to emit. Metrics and the final recommendation
/// are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub executive_summary: bool,
    pub five_cs: bool,
    pub risk_assessment: bool,
}

impl Sections {
    pub fn all() -> Self {
        Self {
            executive_summary: true,
            five_cs: true,
            risk_assessment: true,
        }
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::all()
    }
}

impl From<&ReportPreferences> for Sections {
    fn from(prefs: &ReportPreferences) -> Self {
        Self {
            executive_summary: prefs.include_executive_summary,
            five_cs: prefs.include_5cs,
            risk_assessment: prefs.include_risk_assessment,
        }
    }
}

/// Render a record in the given format with every section.
pub fn render(record: Option<&AnalysisRecord>, format: OutputFormat) -> String {
    render_with_sections(record, format, &Sections::all())
}

/// Render a record, honouring the user's report preferences.
pub fn render_with_preferences(
    record: Option<&AnalysisRecord>,
    format: OutputFormat,
    prefs: &ReportPreferences,
) -> String {
    render_with_sections(record, format, &Sections::from(prefs))
}

fn render_with_sections(
    record: Option<&AnalysisRecord>,
    format: OutputFormat,
    sections: &Sections,
) -> String {
    match format {
        OutputFormat::Markdown => markdown::render_sections(record, sections),
        OutputFormat::WordHtml => word::render_sections(record, sections),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Markdown => "md",
        OutputFormat::WordHtml => "doc",
    }
}
