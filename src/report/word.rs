//! Word-compatible HTML credit memo
//!
//! Generates a self-contained HTML document carrying the Office XML
//! namespaces and a print-view `WordDocument` block, so it opens cleanly in
//! a word processor when saved as `.doc` or posted to a conversion service.
//! Section content comes from `fields`, the same projections the Markdown
//! reporter uses. Record text is HTML-escaped.

use super::fields;
use super::Sections;
use crate::models::AnalysisRecord;

/// Returned when there is no record to render.
pub const NO_DATA: &str = "<html><body><h1>Error</h1><p>No data to export</p></body></html>";

/// Office namespaces declared on the root element.
pub const OFFICE_NAMESPACES: &str = "xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'";

/// Render the full report.
pub fn render(record: Option<&AnalysisRecord>) -> String {
    render_sections(record, &Sections::all())
}

/// Render the report, leaving out sections switched off in `sections`.
pub fn render_sections(record: Option<&AnalysisRecord>, sections: &Sections) -> String {
    let Some(record) = record else {
        return NO_DATA.to_string();
    };

    let mut html = String::new();
    html.push_str(&render_head());
    html.push_str("<body>\n");
    html.push_str(&render_header(record));

    if sections.executive_summary {
        html.push_str(&render_executive_summary(record));
    }
    if sections.five_cs {
        html.push_str(&render_five_cs(record));
    }
    html.push_str(&render_metrics(record));
    if sections.risk_assessment {
        html.push_str(&render_risk(record));
    }
    html.push_str(&render_recommendation(record));

    html.push_str("</body>\n</html>\n");
    html
}

fn render_head() -> String {
    format!(
        r#"<html {OFFICE_NAMESPACES}>
<head>
    <meta charset="UTF-8">
    <title>Credit Memo Report</title>
    <!--[if gte mso 9]>
    <xml>
    <w:WordDocument>
    <w:View>Print</w:View>
    <w:Zoom>100</w:Zoom>
    <w:DoNotOptimizeForBrowser/>
    </w:WordDocument>
    </xml>
    <![endif]-->
    <style>
{CSS}
    </style>
</head>
"#
    )
}

fn render_header(record: &AnalysisRecord) -> String {
    format!(
        "<h1>Credit Memo Report</h1>\n\
         <p><strong>Document Type:</strong> {}</p>\n\
         <p><strong>Confidence Level:</strong> {}</p>\n",
        html_escape(fields::document_type(record)),
        html_escape(&fields::confidence(record))
    )
}

fn list(html: &mut String, items: &[&str]) {
    html.push_str("<ul>\n");
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
    }
    html.push_str("</ul>\n");
}

fn render_executive_summary(record: &AnalysisRecord) -> String {
    let mut html = String::from("<h2>1. Executive Summary</h2>\n");

    match fields::executive_summary(record) {
        Some(text) => html.push_str(&format!("<p>{}</p>\n", html_escape(text))),
        None => html.push_str(&format!(
            "<p><em>{}</em></p>\n",
            fields::defaults::EXECUTIVE_SUMMARY
        )),
    }

    if let Some(takeaways) = fields::key_takeaways(record) {
        html.push_str("<h3>Key Takeaways</h3>\n");
        list(&mut html, &takeaways);
    }

    html
}

fn render_five_cs(record: &AnalysisRecord) -> String {
    let Some(dimensions) = fields::dimensions(record) else {
        return String::new();
    };

    let mut html = String::from("<h2>2. Credit Analysis (5Cs)</h2>\n");
    for dimension in dimensions {
        html.push_str(&format!(
            "<h3>{}</h3>\n<p>{}</p>\n",
            html_escape(&dimension.heading),
            html_escape(dimension.content)
        ));
        if let Some(highlights) = &dimension.highlights {
            list(&mut html, highlights);
        }
    }
    html
}

fn render_metrics(record: &AnalysisRecord) -> String {
    let Some(metrics) = fields::metrics(record) else {
        return String::new();
    };

    let mut html = String::from(
        "<h2>3. Financial Metrics</h2>\n<table>\n<tr><th>Metric</th><th>Value</th><th>Status</th></tr>\n",
    );
    for metric in &metrics {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            html_escape(&metric.name),
            status_class(metric.healthy),
            html_escape(&metric.display_value()),
            html_escape(metric.status)
        ));
    }
    html.push_str("</table>\n");
    html
}

fn render_risk(record: &AnalysisRecord) -> String {
    let Some(risk) = fields::risk(record) else {
        return String::new();
    };

    let mut html = String::from("<h2>4. Risk Assessment</h2>\n");

    if let Some(flags) = &risk.red_flags {
        html.push_str("<h3>Red Flags</h3>\n<ul>\n");
        for flag in flags {
            html.push_str(&format!(
                "<li><span class=\"{}\">{}</span> ({} Risk): {}</li>\n",
                severity_class(flag.high),
                html_escape(flag.issue),
                html_escape(flag.severity),
                html_escape(flag.mitigant)
            ));
        }
        html.push_str("</ul>\n");
    }
    if let Some(strengths) = &risk.strengths {
        html.push_str("<h3>Strengths</h3>\n");
        list(&mut html, strengths);
    }
    if let Some(weaknesses) = &risk.weaknesses {
        html.push_str("<h3>Weaknesses</h3>\n");
        list(&mut html, weaknesses);
    }

    html
}

fn render_recommendation(record: &AnalysisRecord) -> String {
    let justification = fields::justification(record)
        .map(|j| {
            format!(
                "    <p><strong>Justification:</strong> {}</p>\n",
                html_escape(j)
            )
        })
        .unwrap_or_default();

    format!(
        "<div class=\"recommendation\">\n    <h2>5. Final Recommendation</h2>\n    <p><strong>Recommendation:</strong> {}</p>\n{}</div>\n",
        html_escape(fields::recommendation(record)),
        justification
    )
}

fn status_class(healthy: bool) -> &'static str {
    if healthy {
        "metric-value"
    } else {
        "risk-medium"
    }
}

fn severity_class(high: bool) -> &'static str {
    if high {
        "risk-high"
    } else {
        "risk-medium"
    }
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Print-oriented styles; Word ignores most layout CSS.
const CSS: &str = r#"        body { font-family: 'Calibri', 'Arial', sans-serif; font-size: 11pt; }
        h1 { color: #1e3a8a; font-size: 16pt; border-bottom: 2px solid #e5e7eb; padding-bottom: 10px; }
        h2 { color: #374151; font-size: 14pt; margin-top: 20px; border-bottom: 1px solid #e5e7eb; }
        h3 { color: #4b5563; font-size: 12pt; font-weight: bold; margin-top: 15px; }
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }
        th, td { border: 1px solid #d1d5db; padding: 8px; text-align: left; }
        th { background-color: #f3f4f6; font-weight: bold; }
        .metric-value { font-weight: bold; color: #059669; }
        .risk-high { color: #dc2626; font-weight: bold; }
        .risk-medium { color: #f59e0b; font-weight: bold; }
        ul { margin: 10px 0; padding-left: 20px; }
        li { margin-bottom: 5px; }
        .recommendation { padding: 15px; border: 1px solid #ccc; background-color: #f9fafb; margin: 15px 0; }"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_record;
    use crate::models::{Summary, TextItem, RiskAssessment};
    use crate::overlay::{apply_overlay, RecordPatch, SummaryPatch};

    #[test]
    fn test_none_renders_error_document() {
        assert_eq!(render(None), NO_DATA);
    }

    #[test]
    fn test_office_headers_present() {
        let html = render(Some(&sample_record()));
        assert!(html.starts_with("<html xmlns:o='urn:schemas-microsoft-com:office:office'"));
        assert!(html.contains("<w:View>Print</w:View>"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_metric_status_classes() {
        let html = render(Some(&sample_record()));
        assert!(html.contains(
            "<tr><td>Liquidity - Current Ratio</td><td class=\"metric-value\">1.5x</td><td>healthy</td></tr>"
        ));
        assert!(html.contains(
            "<tr><td>Leverage - Debt-to-Equity</td><td class=\"risk-medium\">2.9x</td><td>critical</td></tr>"
        ));
    }

    #[test]
    fn test_red_flag_severity_classes() {
        let html = render(Some(&sample_record()));
        assert!(html.contains(
            "<li><span class=\"risk-high\">Customer concentration</span> (High Risk): Long-term contracts</li>"
        ));
        assert!(html.contains(
            "<li><span class=\"risk-medium\">FX exposure</span> (Medium Risk): No mitigant listed</li>"
        ));
    }

    #[test]
    fn test_defaults_match_markdown() {
        let html = render(Some(&AnalysisRecord::default()));
        assert!(html.contains("<p><strong>Document Type:</strong> Financial Document</p>"));
        assert!(html.contains("<p><strong>Confidence Level:</strong> Draft</p>"));
        assert!(html.contains("<p><em>No executive summary available.</em></p>"));
        assert!(html.contains("<p><strong>Recommendation:</strong> Pending</p>"));
        assert!(!html.contains("Justification"));
        assert!(!html.contains("<h2>3. Financial Metrics</h2>"));
    }

    #[test]
    fn test_record_text_is_escaped() {
        let record = AnalysisRecord {
            summary: Some(Summary {
                executive_summary: Some("<script>alert('x')</script> & more".into()),
                ..Default::default()
            }),
            risk_assessment: Some(RiskAssessment {
                strengths: Some(vec![Some(TextItem {
                    text: Some("A < B".into()),
                    source: None,
                })]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let html = render(Some(&record));
        assert!(html.contains("<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more</p>"));
        assert!(html.contains("<li>A &lt; B</li>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_five_cs_section() {
        let html = render(Some(&sample_record()));
        assert!(html.contains("<h3>CHARACTER</h3>\n<p>Experienced management.</p>\n<ul>\n<li>20 years in business</li>\n</ul>\n"));
        assert!(html.contains("<h3>COLLATERAL</h3>\n<p>No analysis provided.</p>\n"));
    }

    #[test]
    fn test_overlay_changes_only_executive_summary() {
        let record = sample_record();
        let patch = RecordPatch {
            summary: Some(SummaryPatch {
                executive_summary: Some("X".into()),
                ..Default::default()
            }),
        };
        let before = render(Some(&record));
        let merged = apply_overlay(&record, &patch);
        let after = render(Some(&*merged));

        let before_lines: Vec<&str> = before.lines().collect();
        let after_lines: Vec<&str> = after.lines().collect();
        assert_eq!(before_lines.len(), after_lines.len());
        let changed: Vec<(&str, &str)> = before_lines
            .iter()
            .zip(&after_lines)
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (*a, *b))
            .collect();
        assert_eq!(
            changed,
            vec![("<p>Borrower shows stable cash flows.</p>", "<p>X</p>")]
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = sample_record();
        assert_eq!(render(Some(&record)), render(Some(&record)));
    }
}
