//! Export command - write credit memo files

use crate::export::{
    export_markdown, export_word_local, export_word_remote, Artifact, DirectoryDownload, Download,
    ExportKind,
};
use crate::models::AnalysisRecord;
use crate::overlay::{apply_overlay, RecordPatch};
use crate::report::word;
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

pub struct ExportArgs {
    pub kind: ExportKind,
    pub record: Option<PathBuf>,
    pub edits: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub filename: Option<String>,
    pub fallback_local: bool,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let patch = match &args.edits {
        Some(path) => RecordPatch::load(path)?,
        None => RecordPatch::default(),
    };

    let mut fell_back = false;
    let mut artifact = match args.kind {
        ExportKind::Markdown => {
            let record = load_record(args.record.as_deref(), args.kind)?;
            export_markdown(&record, &patch)
        }
        ExportKind::Doc => match &args.html {
            Some(path) => {
                let html = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                export_word_local(&html)
            }
            None => {
                let record = load_record(args.record.as_deref(), args.kind)?;
                local_doc(&record, &patch)
            }
        },
        ExportKind::Docx => {
            let record = load_record(args.record.as_deref(), args.kind)?;
            let client = super::service_client()?;
            match export_word_remote(&client, &record, &patch, args.filename.as_deref()) {
                Ok(artifact) => artifact,
                Err(e) if args.fallback_local => {
                    tracing::debug!("word export error: {:?}", e);
                    eprintln!(
                        "{} Word export failed ({}); writing the local .doc rendition instead",
                        style("⚠").yellow(),
                        e
                    );
                    fell_back = true;
                    local_doc(&record, &patch)
                }
                Err(e) => {
                    return Err(e).context(
                        "Word export failed. Retry later, or pass --fallback-local for a .doc rendition",
                    )
                }
            }
        }
    };

    // A .docx name on the local fallback would mislabel the content.
    if let Some(name) = args.filename.as_ref().filter(|_| !fell_back) {
        artifact.filename = name.clone();
    }

    let path = DirectoryDownload::new(&args.out_dir).deliver(&artifact)?;
    println!(
        "{} Exported {} ({})",
        style("✓").green(),
        style(path.display()).cyan(),
        artifact.media_type
    );
    Ok(())
}

fn load_record(path: Option<&Path>, kind: ExportKind) -> Result<AnalysisRecord> {
    let path = path.with_context(|| format!("--record is required for {} export", kind))?;
    AnalysisRecord::load(path)
}

/// The rendered Word HTML body and its print styles, wrapped as a local `.doc`.
fn local_doc(record: &AnalysisRecord, patch: &RecordPatch) -> Artifact {
    let merged = apply_overlay(record, patch);
    let html = word::render(Some(&*merged));
    export_word_local(&format!("{}{}", style_of(&html), body_of(&html)))
}

/// The `<style>` block of a rendered document, tags included.
fn style_of(html: &str) -> &str {
    let Some(open) = html.find("<style>") else {
        return "";
    };
    match html[open..].find("</style>") {
        Some(len) => &html[open..open + len + "</style>".len()],
        None => "",
    }
}

/// Inner HTML of `<body>`, or the whole document if there is none.
fn body_of(html: &str) -> &str {
    let Some(open) = html.find("<body>") else {
        return html;
    };
    let start = open + "<body>".len();
    match html[start..].find("</body>") {
        Some(len) => &html[start..start + len],
        None => &html[start..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_record;

    #[test]
    fn test_body_of() {
        assert_eq!(body_of("<html><body><p>x</p></body></html>"), "<p>x</p>");
        assert_eq!(body_of("<p>bare</p>"), "<p>bare</p>");
        assert_eq!(body_of("<body>open"), "open");
    }

    #[test]
    fn test_style_of() {
        assert_eq!(
            style_of("<head><style>p { x: 1; }</style></head><body></body>"),
            "<style>p { x: 1; }</style>"
        );
        assert_eq!(style_of("<p>no styles</p>"), "");
        assert_eq!(style_of("<style>unclosed"), "");
    }

    #[test]
    fn test_local_doc_keeps_print_styles() {
        let artifact = local_doc(&sample_record(), &RecordPatch::default());
        let text = String::from_utf8_lossy(&artifact.bytes);
        assert!(text.contains("<style>"));
        assert!(text.contains(".risk-high"));
        assert!(text.contains(".metric-value"));
        assert!(text.contains("<h1>Credit Memo Report</h1>"));
        assert_eq!(text.matches("<body>").count(), 1);
    }
}
