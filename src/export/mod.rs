//! Export dispatcher
//!
//! Turns an analysis record (with any analyst edits overlaid) into a
//! downloadable [`Artifact`]:
//! - `markdown` - rendered locally, `credit_memo.md`
//! - `doc` - arbitrary HTML wrapped for Word, `credit_memo_edited.doc`
//! - `docx` - converted by the remote Word service
//!
//! Delivery is behind the [`Download`] port; the CLI writes into a directory.

use crate::client::{ApiResult, ServiceClient};
use crate::models::AnalysisRecord;
use crate::overlay::{apply_overlay, RecordPatch};
use crate::report::markdown;
use crate::report::word::OFFICE_NAMESPACES;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const MARKDOWN_MEDIA_TYPE: &str = "text/markdown";
pub const MSWORD_MEDIA_TYPE: &str = "application/msword";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Export kinds offered to the analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Markdown,
    Doc,
    Docx,
}

impl FromStr for ExportKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportKind::Markdown),
            "doc" => Ok(ExportKind::Doc),
            "docx" | "word" => Ok(ExportKind::Docx),
            _ => Err(anyhow::anyhow!(
                "Unknown export kind '{}'. Valid kinds: markdown, doc, docx",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Markdown => write!(f, "markdown"),
            ExportKind::Doc => write!(f, "doc"),
            ExportKind::Docx => write!(f, "docx"),
        }
    }
}

/// Where artifacts end up.
pub trait Download {
    /// Hand the artifact to the user, returning where it went.
    fn deliver(&self, artifact: &Artifact) -> Result<PathBuf>;
}

/// Writes artifacts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Download for DirectoryDownload {
    fn deliver(&self, artifact: &Artifact) -> Result<PathBuf> {
        // Only the final component is honoured; names never escape the directory.
        let name = Path::new(&artifact.filename)
            .file_name()
            .with_context(|| format!("'{}' is not a usable file name", artifact.filename))?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(name);
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(
            "exported {} ({}, {} bytes)",
            path.display(),
            artifact.media_type,
            artifact.bytes.len()
        );
        Ok(path)
    }
}

/// Default download name; edited exports get an `_edited` suffix.
pub fn default_filename(kind: ExportKind, edited: bool) -> String {
    let stem = if edited { "credit_memo_edited" } else { "credit_memo" };
    match kind {
        ExportKind::Markdown => format!("{}.md", stem),
        ExportKind::Doc => "credit_memo_edited.doc".to_string(),
        ExportKind::Docx => format!("{}.docx", stem),
    }
}

/// Render the (overlaid) record as Markdown.
pub fn export_markdown(record: &AnalysisRecord, edits: &RecordPatch) -> Artifact {
    let merged = apply_overlay(record, edits);
    Artifact {
        filename: default_filename(ExportKind::Markdown, !edits.is_empty()),
        media_type: MARKDOWN_MEDIA_TYPE,
        bytes: markdown::render(Some(&*merged)).into_bytes(),
    }
}

/// Wrap `html` in an Office-flavoured document. The fragment is embedded
/// as-is; callers are responsible for what it contains.
pub fn wrap_word_html(html: &str) -> String {
    format!(
        "<html {OFFICE_NAMESPACES}>\n<head><meta charset=\"utf-8\"><title>Export</title></head><body>{html}</body></html>\n"
    )
}

/// Save edited HTML as a Word-openable `.doc` (BOM-prefixed HTML).
pub fn export_word_local(html: &str) -> Artifact {
    let wrapped = wrap_word_html(html);
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + wrapped.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(wrapped.as_bytes());
    Artifact {
        filename: default_filename(ExportKind::Doc, true),
        media_type: MSWORD_MEDIA_TYPE,
        bytes,
    }
}

/// Convert the (overlaid) record to `.docx` through the remote Word service.
/// Transport and status failures propagate unchanged; there is no retry.
pub fn export_word_remote(
    client: &ServiceClient,
    record: &AnalysisRecord,
    edits: &RecordPatch,
    filename: Option<&str>,
) -> ApiResult<Artifact> {
    let merged = apply_overlay(record, edits);
    let bytes = client.export_word(&merged)?;
    Ok(Artifact {
        filename: filename
            .map(str::to_string)
            .unwrap_or_else(|| default_filename(ExportKind::Docx, !edits.is_empty())),
        media_type: DOCX_MEDIA_TYPE,
        bytes,
    })
}
