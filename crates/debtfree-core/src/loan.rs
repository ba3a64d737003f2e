use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DebtFreeError;
use crate::types::{Money, Rate, MAX_TENURE_MONTHS};
use crate::DebtFreeResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Product category a loan belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    Home,
    Personal,
    Car,
    Education,
    Gold,
    CreditCard,
}

/// How the loan's rate is contracted. Floating-rate loans carry no
/// prepayment penalty under the regulator's rules; fixed and hybrid may.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    #[default]
    Floating,
    Fixed,
    Hybrid,
}

/// A loan as supplied by the caller. Immutable for the lifetime of an
/// optimization run; all mutable state lives in the per-run snapshots.
///
/// The four deduction flags are mutually independent — a home loan is
/// typically eligible for both the principal and the interest category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub lender: String,
    pub kind: LoanKind,
    #[serde(default)]
    pub rate_kind: RateKind,
    pub principal_amount: Money,
    pub outstanding_principal: Money,
    /// Annual rate in percent (8.5 = 8.5% p.a.).
    pub interest_rate: Rate,
    pub tenure_months: u32,
    pub remaining_tenure_months: u32,
    pub emi_amount: Money,
    /// Percent of any extra payment consumed as penalty (2 = 2%).
    #[serde(default)]
    pub prepayment_penalty_pct: Rate,
    /// Percent added to the effective rate as early-payoff friction.
    #[serde(default)]
    pub foreclosure_charges_pct: Rate,
    /// Interest on this loan is deductible (home-loan interest category).
    #[serde(default)]
    pub eligible_interest_deduction: bool,
    /// Education-loan interest category (uncapped deduction).
    #[serde(default)]
    pub eligible_education_deduction: bool,
    /// First-home buyer additional interest category.
    #[serde(default)]
    pub eligible_first_home_deduction: bool,
    /// Principal repayment (not interest) is deductible.
    #[serde(default)]
    pub eligible_principal_deduction: bool,
}

impl Loan {
    /// True when any interest-category deduction applies.
    pub fn has_interest_deduction(&self) -> bool {
        self.eligible_interest_deduction
            || self.eligible_education_deduction
            || self.eligible_first_home_deduction
    }

    /// Enforce the input contract. Simulation never sees an invalid
    /// record; degenerate-but-valid ones (zero outstanding balance) are
    /// identity cases handled downstream.
    pub fn validate(&self) -> DebtFreeResult<()> {
        if self.principal_amount <= Decimal::ZERO {
            return Err(self.invalid("principal_amount", "must be positive"));
        }
        if self.outstanding_principal < Decimal::ZERO {
            return Err(self.invalid("outstanding_principal", "cannot be negative"));
        }
        if self.outstanding_principal > self.principal_amount {
            return Err(self.invalid(
                "outstanding_principal",
                "cannot exceed principal_amount",
            ));
        }
        if self.interest_rate < Decimal::ZERO || self.interest_rate > dec!(50) {
            return Err(self.invalid("interest_rate", "must be between 0 and 50 percent"));
        }
        if self.tenure_months == 0 || self.tenure_months > MAX_TENURE_MONTHS {
            return Err(self.invalid("tenure_months", "must be between 1 and 600"));
        }
        if self.remaining_tenure_months > self.tenure_months {
            return Err(self.invalid(
                "remaining_tenure_months",
                "cannot exceed tenure_months",
            ));
        }
        if self.emi_amount <= Decimal::ZERO {
            return Err(self.invalid("emi_amount", "must be positive"));
        }
        if self.prepayment_penalty_pct < Decimal::ZERO || self.prepayment_penalty_pct >= dec!(100) {
            return Err(self.invalid(
                "prepayment_penalty_pct",
                "must be at least 0 and below 100 percent",
            ));
        }
        if self.foreclosure_charges_pct < Decimal::ZERO {
            return Err(self.invalid("foreclosure_charges_pct", "cannot be negative"));
        }
        Ok(())
    }

    fn invalid(&self, field: &str, reason: &str) -> DebtFreeError {
        DebtFreeError::InvalidInput {
            field: field.into(),
            reason: format!("loan '{}': {}", self.id, reason),
        }
    }
}
