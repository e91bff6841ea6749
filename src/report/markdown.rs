//! Markdown credit memo
//!
//! Produces the `credit_memo.md` download. Output is deterministic for a
//! given record: no timestamps, no ordering that depends on hashing.

use super::fields;
use super::Sections;
use crate::models::AnalysisRecord;

/// Returned when there is no record to render.
pub const NO_DATA: &str = "# Error: No Data Available";

/// Render the full report.
pub fn render(record: Option<&AnalysisRecord>) -> String {
    render_sections(record, &Sections::all())
}

/// Render the report, leaving out sections switched off in `sections`.
pub fn render_sections(record: Option<&AnalysisRecord>, sections: &Sections) -> String {
    let Some(record) = record else {
        return NO_DATA.to_string();
    };

    let mut md = String::from("# Credit Memo Report\n\n");
    md.push_str(&render_header(record));

    if sections.executive_summary {
        md.push_str(&render_executive_summary(record));
    }
    if sections.five_cs {
        md.push_str(&render_five_cs(record));
    }
    md.push_str(&render_metrics(record));
    if sections.risk_assessment {
        md.push_str(&render_risk(record));
    }
    md.push_str(&render_recommendation(record));

    md
}

fn render_header(record: &AnalysisRecord) -> String {
    format!(
        "**Document Type:** {}\n**Confidence Level:** {}\n\n",
        fields::document_type(record),
        fields::confidence(record)
    )
}

fn bullets(md: &mut String, title: &str, items: &[&str]) {
    md.push_str(&format!("**{}:**\n", title));
    for item in items {
        md.push_str(&format!("- {}\n", item));
    }
    md.push('\n');
}

fn render_executive_summary(record: &AnalysisRecord) -> String {
    let mut md = String::from("## 1. Executive Summary\n\n");

    match fields::executive_summary(record) {
        Some(text) => md.push_str(&format!("{}\n\n", text)),
        None => md.push_str(&format!("_{}_\n\n", fields::defaults::EXECUTIVE_SUMMARY)),
    }

    if let Some(takeaways) = fields::key_takeaways(record) {
        bullets(&mut md, "Key Takeaways", &takeaways);
    }

    md
}

fn render_five_cs(record: &AnalysisRecord) -> String {
    let Some(dimensions) = fields::dimensions(record) else {
        return String::new();
    };

    let mut md = String::from("## 2. Credit Analysis (5Cs)\n\n");
    for dimension in dimensions {
        md.push_str(&format!("### {}\n{}\n\n", dimension.heading, dimension.content));
        if let Some(highlights) = &dimension.highlights {
            bullets(&mut md, "Highlights", highlights);
        }
    }
    md
}

fn render_metrics(record: &AnalysisRecord) -> String {
    let Some(metrics) = fields::metrics(record) else {
        return String::new();
    };

    let mut md = String::from("## 3. Financial Metrics\n\n");
    for metric in &metrics {
        md.push_str(&format!(
            "- **{}:** {} ({})\n",
            metric.name,
            metric.display_value(),
            metric.status
        ));
    }
    md.push('\n');
    md
}

fn render_risk(record: &AnalysisRecord) -> String {
    let Some(risk) = fields::risk(record) else {
        return String::new();
    };

    let mut md = String::from("## 4. Risk Assessment\n\n");

    if let Some(flags) = &risk.red_flags {
        md.push_str("**Red Flags:**\n");
        for flag in flags {
            md.push_str(&format!(
                "- **{}** ({} Risk): {}\n",
                flag.issue, flag.severity, flag.mitigant
            ));
        }
        md.push('\n');
    }
    if let Some(strengths) = &risk.strengths {
        bullets(&mut md, "Strengths", strengths);
    }
    if let Some(weaknesses) = &risk.weaknesses {
        bullets(&mut md, "Weaknesses", weaknesses);
    }

    md
}

fn render_recommendation(record: &AnalysisRecord) -> String {
    let mut md = format!(
        "## 5. Final Recommendation\n\n**Recommendation:** {}\n\n",
        fields::recommendation(record)
    );
    if let Some(justification) = fields::justification(record) {
        md.push_str(&format!("**Justification:** {}\n", justification));
    }
    md
}
