//! What-if scenarios over the scorer inputs
//!
//! A [`Scenario`] keeps the baseline recovered from the record next to a
//! simulated copy the analyst adjusts. Evaluating it classifies both and
//! reports whether the tier moved.

use super::scorer::{classify, RiskClassification};
use super::{baseline_from_record, FinancialInputs};
use crate::config::RiskThresholds;
use crate::models::AnalysisRecord;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// One adjustable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Liquidity,
    EbitdaMargin,
    DebtToEquity,
    NetProfitMargin,
    Cash,
}

impl FromStr for Indicator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "liquidity" => Ok(Indicator::Liquidity),
            "ebitda-margin" | "ebitda" => Ok(Indicator::EbitdaMargin),
            "debt-to-equity" | "de" => Ok(Indicator::DebtToEquity),
            "net-profit-margin" | "net-profit" => Ok(Indicator::NetProfitMargin),
            "cash" => Ok(Indicator::Cash),
            _ => Err(anyhow!(
                "Unknown indicator '{}'. Valid indicators: liquidity, ebitda-margin, debt-to-equity, net-profit-margin, cash",
                s
            )),
        }
    }
}

impl Indicator {
    fn slot(self, inputs: &mut FinancialInputs) -> &mut f64 {
        match self {
            Indicator::Liquidity => &mut inputs.liquidity,
            Indicator::EbitdaMargin => &mut inputs.ebitda_margin,
            Indicator::DebtToEquity => &mut inputs.debt_to_equity,
            Indicator::NetProfitMargin => &mut inputs.net_profit_margin,
            Indicator::Cash => &mut inputs.cash,
        }
    }
}

/// Baseline and simulated inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    base: FinancialInputs,
    simulated: FinancialInputs,
}

/// Base versus simulated value of one charted indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub name: &'static str,
    pub base: f64,
    pub simulated: f64,
}

impl Comparison {
    /// True when the simulated value is lower than the baseline.
    pub fn declined(&self) -> bool {
        self.simulated < self.base
    }
}

/// Classification of both sides of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub base: RiskClassification,
    pub current: RiskClassification,
}

impl SensitivityReport {
    /// True when the simulated tier differs from the baseline tier.
    pub fn changed(&self) -> bool {
        self.base.tier != self.current.tier
    }
}

impl Scenario {
    pub fn new(base: FinancialInputs) -> Self {
        Self {
            base,
            simulated: base,
        }
    }

    /// Baseline from the record's metrics, defaults when there is no record.
    pub fn from_record(record: Option<&AnalysisRecord>) -> Self {
        Self::new(baseline_from_record(record))
    }

    pub fn base(&self) -> &FinancialInputs {
        &self.base
    }

    pub fn simulated(&self) -> &FinancialInputs {
        &self.simulated
    }

    /// Adjust one simulated input; the baseline never changes.
    pub fn set(&mut self, indicator: Indicator, value: f64) -> &mut Self {
        *indicator.slot(&mut self.simulated) = value;
        self
    }

    /// Discard every adjustment.
    pub fn reset(&mut self) {
        self.simulated = self.base;
    }

    pub fn evaluate(&self, thresholds: Option<&RiskThresholds>) -> SensitivityReport {
        SensitivityReport {
            base: classify(&self.base, thresholds),
            current: classify(&self.simulated, thresholds),
        }
    }

    /// Ratios then margins, in chart order.
    pub fn comparisons(&self) -> Vec<Comparison> {
        let (b, s) = (&self.base, &self.simulated);
        vec![
            Comparison {
                name: "Liquidity",
                base: b.liquidity,
                simulated: s.liquidity,
            },
            Comparison {
                name: "D/E Ratio",
                base: b.debt_to_equity,
                simulated: s.debt_to_equity,
            },
            Comparison {
                name: "EBITDA %",
                base: b.ebitda_margin,
                simulated: s.ebitda_margin,
            },
            Comparison {
                name: "Net Profit %",
                base: b.net_profit_margin,
                simulated: s.net_profit_margin,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_record;
    use crate::risk::RiskTier;

    #[test]
    fn test_untouched_scenario_is_unchanged() {
        let scenario = Scenario::new(FinancialInputs::default());
        let report = scenario.evaluate(None);
        assert_eq!(report.current.tier, RiskTier::Low);
        assert!(!report.changed());
        assert!(scenario.comparisons().iter().all(|c| !c.declined()));
    }

    #[test]
    fn test_stress_moves_tier() {
        let mut scenario = Scenario::new(FinancialInputs::default());
        scenario
            .set(Indicator::Liquidity, 0.5)
            .set(Indicator::DebtToEquity, 3.0);
        let report = scenario.evaluate(Some(&RiskThresholds::default()));
        assert_eq!(report.base.tier, RiskTier::Low);
        assert_eq!(report.current.tier, RiskTier::High);
        assert!(report.changed());
        assert_eq!(scenario.base().liquidity, 1.5);

        let comparisons = scenario.comparisons();
        assert_eq!(comparisons[0].name, "Liquidity");
        assert!(comparisons[0].declined());
        assert_eq!(comparisons[1].name, "D/E Ratio");
        assert!(!comparisons[1].declined());
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut scenario = Scenario::new(FinancialInputs::default());
        scenario.set(Indicator::Cash, 1.0);
        scenario.reset();
        assert_eq!(scenario.simulated(), scenario.base());
    }

    #[test]
    fn test_from_sample_record() {
        let scenario = Scenario::from_record(Some(&sample_record()));
        // D/E 2.9 > 2.5 (+2), net margin 4.5 < 5 (+1)
        let report = scenario.evaluate(None);
        assert_eq!(report.base.score, 3);
        assert_eq!(report.base.tier, RiskTier::Medium);
    }

    #[test]
    fn test_indicator_parsing() {
        assert_eq!("ebitda_margin".parse::<Indicator>().unwrap(), Indicator::EbitdaMargin);
        assert_eq!("Debt-To-Equity".parse::<Indicator>().unwrap(), Indicator::DebtToEquity);
        assert!("quick-ratio".parse::<Indicator>().is_err());
    }
}
