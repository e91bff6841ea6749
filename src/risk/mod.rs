//! Borrower risk scoring
//!
//! Four indicators are compared against the analyst's thresholds and
//! weighted into a score:
//!
//! ```text
//! debt_to_equity    > thresholds.debt_to_equity     +2
//! liquidity         < thresholds.liquidity_ratio    +2
//! ebitda_margin     < 10 (fixed)                    +1
//! net_profit_margin < thresholds.net_profit_margin  +1
//!
//! score >= 4  High Risk
//! score >= 2  Medium Risk
//! otherwise   Low Risk
//! ```
//!
//! Baseline inputs are pulled out of the record's metric list by keyword
//! ([`extract`]); [`sensitivity`] stress-tests them.

pub mod extract;
pub mod scorer;
pub mod sensitivity;

pub use extract::{baseline_from_metrics, baseline_from_record, find_metric};
pub use scorer::{classify, RiskClassification, RiskTier, StyleHints, EBITDA_MARGIN_FLOOR};
pub use sensitivity::{Comparison, Indicator, Scenario, SensitivityReport};

use serde::{Deserialize, Serialize};

/// The indicators the scorer looks at. Margins are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialInputs {
    pub liquidity: f64,
    pub ebitda_margin: f64,
    pub debt_to_equity: f64,
    pub net_profit_margin: f64,
    /// Carried for display; not scored.
    pub cash: f64,
}

impl Default for FinancialInputs {
    fn default() -> Self {
        Self {
            liquidity: 1.5,
            ebitda_margin: 15.0,
            debt_to_equity: 1.8,
            net_profit_margin: 10.0,
            cash: 500_000.0,
        }
    }
}
