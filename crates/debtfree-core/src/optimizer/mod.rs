pub mod aggregator;
pub mod engine;
pub mod snapshot;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use aggregator::{
    optimize, quick_compare, LoanPayoffResult, OptimizationInput, OptimizationResult,
    QuickCompareOutput, StrategyResult,
};
pub use engine::{simulate, SimulationRun};
pub use snapshot::{LoanSnapshot, LoanStatus};

use crate::tax::{DeductionWeights, FilingRegime};
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Budget configuration
// ---------------------------------------------------------------------------

/// A one-off extra payment scheduled for a simulation month (1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSum {
    pub month: u32,
    pub amount: Money,
}

/// Caller-supplied budget and tax parameters for an optimization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Extra amount available every month beyond scheduled EMIs.
    #[serde(default)]
    pub monthly_extra: Money,
    #[serde(default)]
    pub lump_sums: Vec<LumpSum>,
    /// Marginal tax bracket as a fraction (0.30 = 30%).
    #[serde(default)]
    pub tax_bracket: Rate,
    #[serde(default)]
    pub regime: FilingRegime,
    /// Overrides the regime's default deduction weights when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduction_weights: Option<DeductionWeights>,
}

impl BudgetConfig {
    /// Sum of lump sums scheduled for a given month.
    pub(crate) fn lump_sum_for_month(&self, month: u32) -> Money {
        self.lump_sums
            .iter()
            .filter(|lump| lump.month == month)
            .map(|lump| lump.amount)
            .sum()
    }

    /// Effective deduction weights: the explicit override, or the
    /// regime's defaults.
    pub fn weights(&self) -> DeductionWeights {
        self.deduction_weights
            .unwrap_or_else(|| self.regime.deduction_weights())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lump_sums_aggregate_per_month() {
        let cfg = BudgetConfig {
            lump_sums: vec![
                LumpSum { month: 6, amount: dec!(50_000) },
                LumpSum { month: 6, amount: dec!(25_000) },
                LumpSum { month: 12, amount: dec!(100_000) },
            ],
            ..BudgetConfig::default()
        };
        assert_eq!(cfg.lump_sum_for_month(6), dec!(75_000));
        assert_eq!(cfg.lump_sum_for_month(12), dec!(100_000));
        assert_eq!(cfg.lump_sum_for_month(7), Decimal::ZERO);
    }

    #[test]
    fn test_weights_override_beats_regime() {
        let cfg = BudgetConfig {
            regime: FilingRegime::IndiaNewRegime,
            deduction_weights: Some(DeductionWeights::default()),
            ..BudgetConfig::default()
        };
        assert_eq!(cfg.weights(), DeductionWeights::default());

        let plain = BudgetConfig {
            regime: FilingRegime::IndiaNewRegime,
            ..BudgetConfig::default()
        };
        assert_eq!(plain.weights(), DeductionWeights::NONE);
    }
}
