//! Sparse edits layered over an analysis record
//!
//! Analysts edit the summary before exporting. Edits are kept as a patch
//! holding only the changed fields and merged at render/export time; the
//! record loaded from the service is never modified.

use crate::models::{AnalysisRecord, Summary};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

/// Changed subtree of an [`AnalysisRecord`]. Only the summary is editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryPatch>,
}

/// Summary fields to override. `None` leaves the base value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_takeaways: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_justification: Option<String>,
}

impl SummaryPatch {
    fn is_empty(&self) -> bool {
        self.executive_summary.is_none()
            && self.key_takeaways.is_none()
            && self.recommendation.is_none()
            && self.recommendation_justification.is_none()
    }
}

impl RecordPatch {
    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.summary.as_ref().map_or(true, SummaryPatch::is_empty)
    }

    /// Load a patch from a JSON file such as `{"summary": {"executive_summary": "..."}}`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read edits {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("edits in {} are not a valid patch", path.display()))
    }

    /// Record an edit to one summary text field, by its JSON name.
    pub fn set_summary_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let summary = self.summary.get_or_insert_with(SummaryPatch::default);
        let value = Some(value.into());
        match field {
            "executive_summary" => summary.executive_summary = value,
            "recommendation" => summary.recommendation = value,
            "recommendation_justification" => summary.recommendation_justification = value,
            other => bail!(
                "'{}' is not an editable summary field (executive_summary, recommendation, recommendation_justification)",
                other
            ),
        }
        Ok(())
    }

    /// Drop every edit.
    pub fn clear(&mut self) {
        self.summary = None;
    }
}

/// Merge `patch` over `base`. Borrows `base` unchanged when the patch is empty.
pub fn apply_overlay<'a>(base: &'a AnalysisRecord, patch: &RecordPatch) -> Cow<'a, AnalysisRecord> {
    let Some(edits) = patch.summary.as_ref().filter(|s| !s.is_empty()) else {
        return Cow::Borrowed(base);
    };

    let mut merged = base.clone();
    let summary = merged.summary.get_or_insert_with(Summary::default);
    if let Some(text) = &edits.executive_summary {
        summary.executive_summary = Some(text.clone());
    }
    if let Some(items) = &edits.key_takeaways {
        summary.key_takeaways = Some(items.clone());
    }
    if let Some(text) = &edits.recommendation {
        summary.recommendation = Some(text.clone());
    }
    if let Some(text) = &edits.recommendation_justification {
        summary.recommendation_justification = Some(text.clone());
    }
    Cow::Owned(merged)
}
