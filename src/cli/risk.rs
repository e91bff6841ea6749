//! Risk command - classify the borrower and run what-if adjustments

use crate::models::AnalysisRecord;
use crate::risk::{Indicator, RiskClassification, RiskTier, Scenario};
use anyhow::Result;
use console::style;
use std::path::Path;

pub fn run(record_path: Option<&Path>, adjustments: &[(Indicator, Option<f64>)]) -> Result<()> {
    let record = record_path.map(AnalysisRecord::load).transpose()?;
    let settings = super::open_settings()?;
    let thresholds = settings.settings().risk_thresholds;

    let mut scenario = Scenario::from_record(record.as_ref());
    for (indicator, value) in adjustments {
        if let Some(value) = value {
            scenario.set(*indicator, *value);
        }
    }
    let report = scenario.evaluate(Some(&thresholds));

    println!("\n{}\n", style("Risk Assessment").bold());
    println!(
        "  Thresholds: liquidity >= {}, D/E <= {}, net margin >= {}%",
        thresholds.liquidity_ratio, thresholds.debt_to_equity, thresholds.net_profit_margin
    );
    println!();

    println!(
        "  {:<14} {:>12} {:>12}",
        style("Indicator").dim(),
        style("Base").dim(),
        style("Simulated").dim()
    );
    for row in scenario.comparisons() {
        let simulated = format!("{:>12.2}", row.simulated);
        let simulated = if row.declined() {
            style(simulated).yellow().to_string()
        } else {
            simulated
        };
        println!("  {:<14} {:>12.2} {}", row.name, row.base, simulated);
    }
    println!(
        "  {:<14} {:>12.0} {:>12.0}",
        "Cash",
        scenario.base().cash,
        scenario.simulated().cash
    );
    println!();

    println!("  Current: {}", badge(&report.current));
    if report.changed() {
        println!("  {}", style(format!("(Changed from {})", report.base.label())).dim());
    }
    println!();
    Ok(())
}

fn badge(classification: &RiskClassification) -> String {
    let text = format!("{} (score {})", classification.label(), classification.score);
    match classification.tier {
        RiskTier::Low => style(text).green().bold().to_string(),
        RiskTier::Medium => style(text).yellow().bold().to_string(),
        RiskTier::High => style(text).red().bold().to_string(),
    }
}
