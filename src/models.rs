//! Core data models for creditlens
//!
//! The analysis record is produced by the remote extraction service and
//! consumed by every renderer, exporter and scorer. The service is loose
//! about shape, so every field is optional at every depth and a field that
//! arrives with the wrong JSON type is read as absent instead of failing the
//! whole record. Renderers substitute defaults (see `report::fields`).

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Deserialize an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize an optional list element by element. A non-array becomes
/// `None`; elements of the wrong shape become `None` entries.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| {
                    if item.is_null() {
                        None
                    } else {
                        serde_json::from_value(item).ok()
                    }
                })
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Full analysis result for one uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    /// Keyed by dimension ("character", "capacity", ...), in document order.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub credit_analysis_5cs: Option<IndexMap<String, Option<CreditDimension>>>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub financial_metrics: Option<Vec<Option<Metric>>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
}

impl AnalysisRecord {
    /// Parse a record from the service's JSON body.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("analysis record is not valid JSON")
    }

    /// Load a record previously saved by `creditlens analyze`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis record {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Flattened metric list with null entries dropped.
    pub fn metrics(&self) -> Vec<&Metric> {
        self.financial_metrics
            .iter()
            .flatten()
            .filter_map(Option::as_ref)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Extraction confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub overall_confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub pages_analyzed: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub key_takeaways: Option<Vec<Option<String>>>,
    /// Free-form verdict such as "Approve" or "Conditional Approval".
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub recommendation_justification: Option<String>,
}

/// One of the 5Cs of credit. The service fills exactly one of the four
/// text fields depending on the dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditDimension {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub equity_position: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub loan_purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub repayment_source: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<Option<String>>>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub source_citations: Option<Vec<Option<SourceRef>>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ratios: Option<IndexMap<String, f64>>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub pledged_assets: Option<Vec<Option<String>>>,
}

/// Metric values arrive either as numbers or as preformatted strings
/// ("$1,250.00", "12.5%").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Older service versions send `name` instead of `label`.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub value: Option<MetricValue>,
    /// `"%"`, `"ratio"`, or anything else (rendered without suffix).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// `"healthy"`, `"critical"`, or anything else.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub is_calculated: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

impl Metric {
    /// Label, falling back to the legacy `name` field.
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub red_flags: Option<Vec<Option<RedFlag>>>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<Option<TextItem>>>,
    #[serde(default, deserialize_with = "lenient_seq", skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<Option<TextItem>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    /// `"High"` is highlighted; every other value renders as medium.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mitigant: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

/// Citation back into the source PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(
        default,
        alias = "page",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A representative record as returned by the extraction service.
    pub(crate) const SAMPLE_JSON: &str = r#"{
        "document_type": "Credit Memo",
        "metadata": { "overall_confidence": 0.874, "pages_analyzed": 12 },
        "summary": {
            "executive_summary": "Borrower shows stable cash flows.",
            "key_takeaways": ["Strong liquidity", "", null, "Moderate leverage"],
            "recommendation": "Approve",
            "recommendation_justification": "Covenants are comfortably met."
        },
        "credit_analysis_5cs": {
            "character": { "assessment": "Experienced management.", "highlights": ["20 years in business"] },
            "capital": { "equity_position": "Equity of $4M." },
            "conditions": { "loan_purpose": "Working capital." },
            "capacity": { "repayment_source": "Operating cash flow.", "ratios": { "dscr": 1.8 } },
            "collateral": { "pledged_assets": ["Warehouse"], "source_citations": [{ "page": 4, "snippet": "secured by" }] }
        },
        "financial_metrics": [
            { "category": "Liquidity", "label": "Current Ratio", "value": 1.5, "unit": "ratio", "status": "healthy", "is_calculated": true },
            { "category": "Profitability", "label": "EBITDA Margin", "value": 12, "unit": "%", "status": "healthy" },
            { "category": "Leverage", "name": "Debt-to-Equity", "value": "2.9", "unit": "ratio", "status": "critical" },
            { "category": "Profitability", "label": "Net Profit Margin", "value": "4.5%", "unit": "%", "status": "watch" },
            { "category": "Liquidity", "label": "Cash", "value": "$1,250.00", "unit": "USD" },
            null
        ],
        "risk_assessment": {
            "red_flags": [
                { "issue": "Customer concentration", "severity": "High", "mitigant": "Long-term contracts" },
                { "issue": "FX exposure" }
            ],
            "strengths": [{ "text": "Diversified suppliers" }, { "source": { "page_number": 2, "snippet": "x" } }],
            "weaknesses": [{ "text": "Thin margins" }]
        }
    }"#;

    pub(crate) fn sample_record() -> AnalysisRecord {
        AnalysisRecord::from_json(SAMPLE_JSON).expect("sample record parses")
    }

    #[test]
    fn test_sample_parses_with_order_preserved() {
        let record = sample_record();
        let keys: Vec<&str> = record
            .credit_analysis_5cs
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            ["character", "capital", "conditions", "capacity", "collateral"]
        );
        assert_eq!(record.metrics().len(), 5);
    }

    #[test]
    fn test_page_alias() {
        let record = sample_record();
        let collateral = record.credit_analysis_5cs.as_ref().unwrap()["collateral"]
            .as_ref()
            .unwrap();
        let cite = collateral.source_citations.as_ref().unwrap()[0].as_ref().unwrap();
        assert_eq!(cite.page_number, Some(4));
    }

    #[test]
    fn test_wrong_types_become_absent() {
        let record = AnalysisRecord::from_json(
            r#"{
                "document_type": 42,
                "metadata": "high",
                "summary": { "key_takeaways": "not a list", "recommendation": ["x"] },
                "financial_metrics": [{ "label": "A", "value": true }, 7]
            }"#,
        )
        .unwrap();
        assert!(record.document_type.is_none());
        assert!(record.metadata.is_none());
        let summary = record.summary.as_ref().unwrap();
        assert!(summary.key_takeaways.is_none());
        assert!(summary.recommendation.is_none());
        let metrics = record.financial_metrics.as_ref().unwrap();
        assert_eq!(metrics.len(), 2);
        assert!(metrics[0].as_ref().unwrap().value.is_none());
        assert!(metrics[1].is_none());
    }

    #[test]
    fn test_empty_object_is_default() {
        let record = AnalysisRecord::from_json("{}").unwrap();
        assert_eq!(record, AnalysisRecord::default());
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Number(12.0).to_string(), "12");
        assert_eq!(MetricValue::Number(1.5).to_string(), "1.5");
        assert_eq!(MetricValue::Text("$1,250.00".into()).to_string(), "$1,250.00");
    }

    #[test]
    fn test_display_label_falls_back_to_name() {
        let metric = Metric {
            name: Some("Debt-to-Equity".into()),
            ..Default::default()
        };
        assert_eq!(metric.display_label(), Some("Debt-to-Equity"));
    }
}
