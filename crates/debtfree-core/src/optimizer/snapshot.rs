use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::loan::Loan;
use crate::types::Money;

/// Whether a loan is still being paid within a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Closed,
}

/// Mutable per-loan simulation state.
///
/// Lives in a flat arena indexed by loan position. Every strategy run
/// builds its own arena from the immutable loans, so no run can observe
/// another's intermediate state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSnapshot {
    pub balance: Money,
    pub months_elapsed: u32,
    pub status: LoanStatus,
    pub interest_paid: Money,
    /// Simulation month in which the balance reached zero.
    pub payoff_month: Option<u32>,
}

impl LoanSnapshot {
    /// Starting state for a loan. A zero outstanding balance starts the
    /// snapshot closed: nothing is being paid on it, so it never joins
    /// the freed-EMI pool and no ranking considers it.
    pub fn from_loan(loan: &Loan) -> Self {
        let open = loan.outstanding_principal > Decimal::ZERO;
        LoanSnapshot {
            balance: loan.outstanding_principal.max(Decimal::ZERO),
            months_elapsed: 0,
            status: if open {
                LoanStatus::Active
            } else {
                LoanStatus::Closed
            },
            interest_paid: Decimal::ZERO,
            payoff_month: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}
