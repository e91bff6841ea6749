//! Risk tier classification

use super::FinancialInputs;
use crate::config::RiskThresholds;
use serde::Serialize;

/// EBITDA margin (percent) below which a point is added. Not configurable.
pub const EBITDA_MARGIN_FLOOR: f64 = 10.0;

const HIGH_RISK_SCORE: u32 = 4;
const MEDIUM_RISK_SCORE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK_SCORE {
            RiskTier::High
        } else if score >= MEDIUM_RISK_SCORE {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    pub fn style(&self) -> StyleHints {
        match self {
            RiskTier::Low => StyleHints {
                color: "text-emerald-600",
                background: "bg-emerald-100",
                border: "border-emerald-200",
            },
            RiskTier::Medium => StyleHints {
                color: "text-amber-600",
                background: "bg-amber-100",
                border: "border-amber-200",
            },
            RiskTier::High => StyleHints {
                color: "text-rose-600",
                background: "bg-rose-100",
                border: "border-rose-200",
            },
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation tokens for a tier badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleHints {
    pub color: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskClassification {
    pub tier: RiskTier,
    pub score: u32,
    pub style: StyleHints,
}

impl RiskClassification {
    pub fn label(&self) -> &'static str {
        self.tier.label()
    }
}

/// Score `inputs` against `thresholds`, or the default thresholds when none
/// are configured.
pub fn classify(inputs: &FinancialInputs, thresholds: Option<&RiskThresholds>) -> RiskClassification {
    let fallback = RiskThresholds::default();
    let thresholds = thresholds.unwrap_or(&fallback);

    let mut score = 0;
    if inputs.debt_to_equity > thresholds.debt_to_equity {
        score += 2;
    }
    if inputs.liquidity < thresholds.liquidity_ratio {
        score += 2;
    }
    if inputs.ebitda_margin < EBITDA_MARGIN_FLOOR {
        score += 1;
    }
    if inputs.net_profit_margin < thresholds.net_profit_margin {
        score += 1;
    }

    let tier = RiskTier::from_score(score);
    tracing::debug!("risk score {} -> {}", score, tier);
    RiskClassification {
        tier,
        score,
        style: tier.style(),
    }
}
