pub mod india;
pub mod us;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Regime selection
// ---------------------------------------------------------------------------

/// Filing/regime selector. Determines which loan deduction categories
/// carry weight when nominal rates are converted to post-tax effective
/// rates, and which slab table a marginal bracket lookup uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingRegime {
    /// Indian old regime: principal and interest categories both deduct.
    #[default]
    IndiaOldRegime,
    /// Indian new regime: loan deductions are unavailable.
    IndiaNewRegime,
    /// US filer who itemizes: interest categories deduct, principal never.
    UsItemized,
    /// US filer on the standard deduction: loan deductions don't itemize.
    UsStandard,
}

impl FilingRegime {
    /// Deduction weights available under this regime.
    pub fn deduction_weights(&self) -> DeductionWeights {
        match self {
            FilingRegime::IndiaOldRegime => DeductionWeights::default(),
            FilingRegime::UsItemized => DeductionWeights {
                interest_weight: Decimal::ONE,
                principal_weight: Decimal::ZERO,
            },
            FilingRegime::IndiaNewRegime | FilingRegime::UsStandard => DeductionWeights::NONE,
        }
    }
}

/// Relative weight of each deduction category when computing post-tax
/// effective rates. Interest-category deductions offset the full
/// interest cost (weight 1.0); principal-only deductions offset none of
/// it directly, so they count at half weight by default. These are
/// policy constants, not law — override them per call when modelling a
/// different regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionWeights {
    pub interest_weight: Decimal,
    pub principal_weight: Decimal,
}

impl DeductionWeights {
    pub const NONE: DeductionWeights = DeductionWeights {
        interest_weight: Decimal::ZERO,
        principal_weight: Decimal::ZERO,
    };
}

impl Default for DeductionWeights {
    fn default() -> Self {
        DeductionWeights {
            interest_weight: Decimal::ONE,
            principal_weight: dec!(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_old_regime_carries_default_weights() {
        let w = FilingRegime::IndiaOldRegime.deduction_weights();
        assert_eq!(w.interest_weight, Decimal::ONE);
        assert_eq!(w.principal_weight, dec!(0.5));
    }

    #[test]
    fn test_new_regime_zeroes_weights() {
        let w = FilingRegime::IndiaNewRegime.deduction_weights();
        assert_eq!(w, DeductionWeights::NONE);
    }

    #[test]
    fn test_us_itemized_has_no_principal_weight() {
        let w = FilingRegime::UsItemized.deduction_weights();
        assert_eq!(w.interest_weight, Decimal::ONE);
        assert_eq!(w.principal_weight, Decimal::ZERO);
    }
}
