//! Field projections shared by the Markdown and Word renderers
//!
//! Every value a renderer prints goes through one of these functions, so the
//! fallback order and default text are defined once. Empty strings count as
//! absent.

use crate::models::{AnalysisRecord, CreditDimension, Metric, RedFlag, TextItem};

/// Text substituted for absent or empty fields.
pub mod defaults {
    pub const DOCUMENT_TYPE: &str = "Financial Document";
    pub const CONFIDENCE: &str = "Draft";
    pub const EXECUTIVE_SUMMARY: &str = "No executive summary available.";
    pub const DIMENSION_CONTENT: &str = "No analysis provided.";
    pub const METRIC_NAME: &str = "Unknown Metric";
    pub const METRIC_VALUE: &str = "N/A";
    pub const METRIC_STATUS: &str = "Unknown";
    pub const FLAG_ISSUE: &str = "Issue";
    pub const FLAG_SEVERITY: &str = "Medium";
    pub const FLAG_MITIGANT: &str = "No mitigant listed";
    pub const RECOMMENDATION: &str = "Pending";
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Non-empty entries of an optional string list. `None` when the list is absent.
fn present_items(items: &Option<Vec<Option<String>>>) -> Option<Vec<&str>> {
    items.as_ref().map(|list| {
        list.iter()
            .filter_map(|item| item.as_deref())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

pub fn document_type(record: &AnalysisRecord) -> &str {
    present(&record.document_type).unwrap_or(defaults::DOCUMENT_TYPE)
}

/// Confidence as a rounded percentage ("87%"), or "Draft" when absent or zero.
pub fn confidence(record: &AnalysisRecord) -> String {
    match record.metadata.as_ref().and_then(|m| m.overall_confidence) {
        Some(c) if c != 0.0 && !c.is_nan() => {
            // Half-up, matching how the dashboard rounds
            let pct = (c * 100.0 + 0.5).floor();
            format!("{}%", pct as i64)
        }
        _ => defaults::CONFIDENCE.to_string(),
    }
}

pub fn executive_summary(record: &AnalysisRecord) -> Option<&str> {
    record
        .summary
        .as_ref()
        .and_then(|s| present(&s.executive_summary))
}

pub fn key_takeaways(record: &AnalysisRecord) -> Option<Vec<&str>> {
    record
        .summary
        .as_ref()
        .and_then(|s| present_items(&s.key_takeaways))
}

/// A 5Cs dimension ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionView<'a> {
    pub heading: String,
    pub content: &'a str,
    pub highlights: Option<Vec<&'a str>>,
}

/// First populated text field, in fixed priority order.
pub fn dimension_content(dimension: &CreditDimension) -> &str {
    present(&dimension.assessment)
        .or_else(|| present(&dimension.equity_position))
        .or_else(|| present(&dimension.loan_purpose))
        .or_else(|| present(&dimension.repayment_source))
        .unwrap_or(defaults::DIMENSION_CONTENT)
}

/// Dimensions in document order; null entries are skipped.
pub fn dimensions(record: &AnalysisRecord) -> Option<Vec<DimensionView<'_>>> {
    record.credit_analysis_5cs.as_ref().map(|map| {
        map.iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|dimension| DimensionView {
                    heading: key.to_uppercase(),
                    content: dimension_content(dimension),
                    highlights: present_items(&dimension.highlights),
                })
            })
            .collect()
    })
}

/// A financial metric ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricView<'a> {
    pub name: String,
    pub value: String,
    pub suffix: &'static str,
    pub status: &'a str,
    pub healthy: bool,
}

impl MetricView<'_> {
    /// Value with its unit suffix, e.g. "12%" or "1.5x".
    pub fn display_value(&self) -> String {
        format!("{}{}", self.value, self.suffix)
    }
}

/// Suffix printed after a metric value for the given unit.
pub fn unit_suffix(unit: Option<&str>) -> &'static str {
    match unit {
        Some("%") => "%",
        Some("ratio") => "x",
        _ => "",
    }
}

/// "Category - Label", either part alone, or "Unknown Metric".
pub fn metric_name(metric: &Metric) -> String {
    let parts: Vec<&str> = [present(&metric.category), metric.display_label()]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        defaults::METRIC_NAME.to_string()
    } else {
        parts.join(" - ")
    }
}

pub fn metric_view(metric: &Metric) -> MetricView<'_> {
    let status = present(&metric.status);
    MetricView {
        name: metric_name(metric),
        value: metric
            .value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| defaults::METRIC_VALUE.to_string()),
        suffix: unit_suffix(metric.unit.as_deref()),
        status: status.unwrap_or(defaults::METRIC_STATUS),
        healthy: status == Some("healthy"),
    }
}

pub fn metrics(record: &AnalysisRecord) -> Option<Vec<MetricView<'_>>> {
    record
        .financial_metrics
        .as_ref()
        .map(|list| list.iter().flatten().map(metric_view).collect())
}

/// A red flag ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagView<'a> {
    pub issue: &'a str,
    pub severity: &'a str,
    pub mitigant: &'a str,
    pub high: bool,
}

pub fn flag_view(flag: &RedFlag) -> FlagView<'_> {
    let severity = present(&flag.severity).unwrap_or(defaults::FLAG_SEVERITY);
    FlagView {
        issue: present(&flag.issue).unwrap_or(defaults::FLAG_ISSUE),
        severity,
        mitigant: present(&flag.mitigant).unwrap_or(defaults::FLAG_MITIGANT),
        high: severity == "High",
    }
}

/// Risk section contents. Each list is `None` when absent from the record.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskView<'a> {
    pub red_flags: Option<Vec<FlagView<'a>>>,
    pub strengths: Option<Vec<&'a str>>,
    pub weaknesses: Option<Vec<&'a str>>,
}

fn texts(items: &Option<Vec<Option<TextItem>>>) -> Option<Vec<&str>> {
    items.as_ref().map(|list| {
        list.iter()
            .flatten()
            .filter_map(|item| present(&item.text))
            .collect()
    })
}

pub fn risk(record: &AnalysisRecord) -> Option<RiskView<'_>> {
    record.risk_assessment.as_ref().map(|risk| RiskView {
        red_flags: risk
            .red_flags
            .as_ref()
            .map(|flags| flags.iter().flatten().map(flag_view).collect()),
        strengths: texts(&risk.strengths),
        weaknesses: texts(&risk.weaknesses),
    })
}

pub fn recommendation(record: &AnalysisRecord) -> &str {
    record
        .summary
        .as_ref()
        .and_then(|s| present(&s.recommendation))
        .unwrap_or(defaults::RECOMMENDATION)
}

pub fn justification(record: &AnalysisRecord) -> Option<&str> {
    record
        .summary
        .as_ref()
        .and_then(|s| present(&s.recommendation_justification))
}
