use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::loan::Loan;
use crate::math::emi::{monthly_rate, round_money};
use crate::optimizer::snapshot::{LoanSnapshot, LoanStatus};
use crate::optimizer::BudgetConfig;
use crate::strategy::allocation::gross_to_close;
use crate::strategy::{priority_allocation, priority_order, proportional_split, Strategy};
use crate::types::{Money, MAX_TENURE_MONTHS};

/// Outcome of one simulation run over a deep-copied snapshot arena.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub total_interest: Money,
    pub total_months: u32,
    /// True when the 600-month cap was reached with open balances.
    pub incomplete: bool,
    /// Loan indices in the order their balances reached zero.
    pub payoff_order: Vec<usize>,
    pub snapshots: Vec<LoanSnapshot>,
}

/// Run the month-stepped payoff machine.
///
/// `strategy == None` is the baseline: minimum payments only, no extra
/// distribution and no freed-EMI relay. With a strategy, each month's
/// distributable budget is the configured extra plus any lump sum due
/// plus the EMIs of every loan closed in earlier months.
pub fn simulate(loans: &[Loan], budget: &BudgetConfig, strategy: Option<Strategy>) -> SimulationRun {
    let mut snapshots: Vec<LoanSnapshot> = loans.iter().map(LoanSnapshot::from_loan).collect();
    let rates: Vec<Decimal> = loans
        .iter()
        .map(|loan| monthly_rate(loan.interest_rate))
        .collect();
    let weights = budget.weights();

    let mut payoff_order: Vec<usize> = Vec::new();
    let mut freed_pool = Decimal::ZERO;
    let mut total_months = 0u32;
    let mut incomplete = false;

    if snapshots.iter().any(LoanSnapshot::is_active) {
        for month in 1..=MAX_TENURE_MONTHS {
            let mut newly_closed: Vec<usize> = Vec::new();

            // Scheduled EMI pass, insertion order: interest then principal
            for (i, snap) in snapshots.iter_mut().enumerate() {
                if !snap.is_active() {
                    continue;
                }
                let interest = round_money(snap.balance * rates[i]);
                snap.interest_paid += interest;
                // An EMI below the interest accrues nothing; the balance
                // holds rather than grows, and the run ends incomplete.
                let principal = (loans[i].emi_amount - interest)
                    .max(Decimal::ZERO)
                    .min(snap.balance);
                snap.balance -= principal;
                snap.months_elapsed += 1;
                if snap.balance <= Decimal::ZERO {
                    snap.status = LoanStatus::Closed;
                    snap.payoff_month = Some(month);
                    payoff_order.push(i);
                    newly_closed.push(i);
                }
            }

            // Extra distribution under the active policy
            if let Some(strategy) = strategy {
                let available =
                    budget.monthly_extra + budget.lump_sum_for_month(month) + freed_pool;
                if available > Decimal::ZERO {
                    let allocations = match strategy {
                        Strategy::Proportional => proportional_split(&snapshots, available),
                        _ => {
                            let order = priority_order(
                                strategy,
                                loans,
                                &snapshots,
                                budget.tax_bracket,
                                &weights,
                            );
                            priority_allocation(&order, loans, &snapshots, available)
                        }
                    };
                    for (i, gross) in allocations {
                        let snap = &mut snapshots[i];
                        if !snap.is_active() {
                            continue;
                        }
                        // The penalty consumes part of the payment; a
                        // gross covering the full close cost zeroes the
                        // balance exactly.
                        let penalty_pct = loans[i].prepayment_penalty_pct;
                        let need = gross_to_close(snap.balance, penalty_pct);
                        let net = if gross >= need {
                            snap.balance
                        } else {
                            (gross * (Decimal::ONE - penalty_pct / dec!(100))).min(snap.balance)
                        };
                        snap.balance -= net;
                        if snap.balance <= Decimal::ZERO {
                            snap.status = LoanStatus::Closed;
                            snap.payoff_month = Some(month);
                            payoff_order.push(i);
                            newly_closed.push(i);
                        }
                    }
                }
            }

            // Relay: freed EMIs join the pool from the following month
            for &i in &newly_closed {
                freed_pool += loans[i].emi_amount;
            }

            total_months = month;
            if !snapshots.iter().any(LoanSnapshot::is_active) {
                break;
            }
            if month == MAX_TENURE_MONTHS {
                incomplete = true;
            }
        }
    }

    let total_interest = snapshots.iter().map(|snap| snap.interest_paid).sum();

    SimulationRun {
        total_interest,
        total_months,
        incomplete,
        payoff_order,
        snapshots,
    }
}
