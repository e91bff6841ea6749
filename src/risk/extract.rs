//! Keyword lookup of scorer inputs in the record's metric list
//!
//! Lossy by nature: the first metric whose label or category mentions the
//! keyword wins, and its value is read as the leading number left after
//! stripping everything but digits, `.` and `-`.

use super::FinancialInputs;
use crate::models::{AnalysisRecord, Metric};
use regex::Regex;
use std::sync::OnceLock;

static NON_NUMERIC: OnceLock<Regex> = OnceLock::new();

fn non_numeric() -> &'static Regex {
    NON_NUMERIC.get_or_init(|| Regex::new(r"[^0-9.\-]").expect("valid regex"))
}

/// Value of the first metric whose label (or legacy name) or category
/// contains `keyword`, case-insensitively. `None` when nothing matches or
/// the matched value has no leading number.
pub fn find_metric(metrics: &[&Metric], keyword: &str) -> Option<f64> {
    let keyword = keyword.to_lowercase();
    let metric = metrics.iter().find(|m| {
        let label_hit = m
            .display_label()
            .is_some_and(|l| l.to_lowercase().contains(&keyword));
        let category_hit = m
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&keyword));
        label_hit || category_hit
    })?;

    let raw = metric.value.as_ref()?.to_string();
    let cleaned = non_numeric().replace_all(&raw, "");
    parse_leading_float(&cleaned)
}

/// Parse the longest numeric prefix (`-?digits[.digits]`), like a lenient
/// float reader would.
fn parse_leading_float(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, c) in s.char_indices() {
        match c {
            '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}

/// Look the keywords up in order, keeping the first usable hit. Zero counts
/// as unusable, so an extracted `0` falls through to the next keyword.
fn first_usable(metrics: &[&Metric], keywords: &[&str], default: f64) -> f64 {
    keywords
        .iter()
        .filter_map(|k| find_metric(metrics, k))
        .find(|v| *v != 0.0 && v.is_finite())
        .unwrap_or(default)
}

/// Scorer inputs recovered from a metric list, each falling back to
/// [`FinancialInputs::default`].
pub fn baseline_from_metrics(metrics: &[&Metric]) -> FinancialInputs {
    let d = FinancialInputs::default();
    FinancialInputs {
        liquidity: first_usable(metrics, &["Current Ratio", "Liquidity"], d.liquidity),
        ebitda_margin: first_usable(metrics, &["EBITDA"], d.ebitda_margin),
        debt_to_equity: first_usable(metrics, &["Debt-to-Equity"], d.debt_to_equity),
        net_profit_margin: first_usable(metrics, &["Net Profit"], d.net_profit_margin),
        cash: first_usable(metrics, &["Cash"], d.cash),
    }
}

/// Baseline for a record; a record without metrics yields the defaults.
pub fn baseline_from_record(record: Option<&AnalysisRecord>) -> FinancialInputs {
    match record {
        Some(r) if r.financial_metrics.is_some() => baseline_from_metrics(&r.metrics()),
        _ => FinancialInputs::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_record;
    use crate::models::MetricValue;

    fn metric(label: &str, category: &str, value: MetricValue) -> Metric {
        Metric {
            label: Some(label.to_string()),
            category: Some(category.to_string()),
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_currency_string_is_cleaned() {
        let m = metric("Cash", "Liquidity", MetricValue::Text("$1,250.00".into()));
        assert_eq!(find_metric(&[&m], "cash"), Some(1250.0));
    }

    #[test]
    fn test_keyword_is_case_insensitive_and_checks_category() {
        let m = metric("Quick", "LIQUIDITY", MetricValue::Number(0.9));
        assert_eq!(find_metric(&[&m], "liquidity"), Some(0.9));
    }

    #[test]
    fn test_first_match_wins() {
        let a = metric("EBITDA Margin", "Profitability", MetricValue::Text("n/a".into()));
        let b = metric("EBITDA", "Profitability", MetricValue::Number(12.0));
        assert_eq!(find_metric(&[&a, &b], "EBITDA"), None);
        assert_eq!(find_metric(&[&b, &a], "EBITDA"), Some(12.0));
    }

    #[test]
    fn test_leading_float_prefix() {
        assert_eq!(parse_leading_float("12.5"), Some(12.5));
        assert_eq!(parse_leading_float("-3.2"), Some(-3.2));
        assert_eq!(parse_leading_float("1.2.3"), Some(1.2));
        assert_eq!(parse_leading_float("4-5"), Some(4.0));
        assert_eq!(parse_leading_float("7."), Some(7.0));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn test_no_match_or_no_value() {
        let m = Metric {
            label: Some("Cash".into()),
            ..Default::default()
        };
        assert_eq!(find_metric(&[&m], "Cash"), None);
        assert_eq!(find_metric(&[&m], "Revenue"), None);
        assert_eq!(find_metric(&[], "Cash"), None);
    }

    #[test]
    fn test_baseline_from_sample() {
        let record = sample_record();
        let baseline = baseline_from_record(Some(&record));
        assert_eq!(baseline.liquidity, 1.5);
        assert_eq!(baseline.ebitda_margin, 12.0);
        assert_eq!(baseline.debt_to_equity, 2.9);
        assert_eq!(baseline.net_profit_margin, 4.5);
        assert_eq!(baseline.cash, 1250.0);
    }

    #[test]
    fn test_baseline_liquidity_falls_back_to_second_keyword() {
        let m = metric("Working Capital", "Liquidity", MetricValue::Number(1.1));
        let baseline = baseline_from_metrics(&[&m]);
        assert_eq!(baseline.liquidity, 1.1);
        assert_eq!(baseline.debt_to_equity, 1.8);
    }

    #[test]
    fn test_zero_falls_through_to_default() {
        let m = metric("Net Profit Margin", "Profitability", MetricValue::Number(0.0));
        assert_eq!(find_metric(&[&m], "Net Profit"), Some(0.0));
        assert_eq!(baseline_from_metrics(&[&m]).net_profit_margin, 10.0);
    }

    #[test]
    fn test_no_record_uses_defaults() {
        assert_eq!(baseline_from_record(None), FinancialInputs::default());
        let empty = AnalysisRecord::default();
        assert_eq!(baseline_from_record(Some(&empty)), FinancialInputs::default());
    }
}
