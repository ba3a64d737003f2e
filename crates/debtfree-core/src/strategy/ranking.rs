use rust_decimal::Decimal;

use crate::loan::Loan;
use crate::math::months_to_payoff;
use crate::optimizer::snapshot::LoanSnapshot;
use crate::strategy::Strategy;
use crate::tax::DeductionWeights;
use crate::types::Rate;

/// Loans payable within this many scheduled EMIs are promoted to top
/// priority under SmartHybrid regardless of their effective rate.
pub const QUICK_WIN_EMI_THRESHOLD: u32 = 3;

/// Post-tax effective annual rate used by SmartHybrid ranking.
///
/// `nominal × (1 − bracket × weight)`, where the weight comes from the
/// loan's strongest deduction category, plus the foreclosure charge as
/// early-payoff friction. The bracket is a fraction (0.30 = 30%).
pub fn effective_rate(loan: &Loan, tax_bracket: Rate, weights: &DeductionWeights) -> Rate {
    let weight = if loan.has_interest_deduction() {
        weights.interest_weight
    } else if loan.eligible_principal_deduction {
        weights.principal_weight
    } else {
        Decimal::ZERO
    };

    loan.interest_rate * (Decimal::ONE - tax_bracket * weight) + loan.foreclosure_charges_pct
}

/// Indices of active loans in the order extra budget should be applied.
///
/// Every ordering breaks ties by loan insertion order (the sorts are
/// stable over an index list that starts in insertion order).
/// Proportional has no priority concept and returns insertion order.
pub fn priority_order(
    strategy: Strategy,
    loans: &[Loan],
    snapshots: &[LoanSnapshot],
    tax_bracket: Rate,
    weights: &DeductionWeights,
) -> Vec<usize> {
    let mut order: Vec<usize> = snapshots
        .iter()
        .enumerate()
        .filter(|(_, snap)| snap.is_active())
        .map(|(i, _)| i)
        .collect();

    match strategy {
        Strategy::Avalanche => {
            order.sort_by(|&a, &b| loans[b].interest_rate.cmp(&loans[a].interest_rate));
        }
        Strategy::Snowball => {
            order.sort_by(|&a, &b| snapshots[a].balance.cmp(&snapshots[b].balance));
        }
        Strategy::SmartHybrid => {
            let rates: Vec<Rate> = loans
                .iter()
                .map(|loan| effective_rate(loan, tax_bracket, weights))
                .collect();
            order.sort_by(|&a, &b| rates[b].cmp(&rates[a]));

            let quick_win: Vec<bool> = order
                .iter()
                .map(|&i| {
                    months_to_payoff(
                        snapshots[i].balance,
                        loans[i].interest_rate,
                        loans[i].emi_amount,
                    )
                    .is_some_and(|m| m <= QUICK_WIN_EMI_THRESHOLD)
                })
                .collect();
            let mut promoted = Vec::with_capacity(order.len());
            let mut rest = Vec::new();
            for (pos, &i) in order.iter().enumerate() {
                if quick_win[pos] {
                    promoted.push(i);
                } else {
                    rest.push(i);
                }
            }
            promoted.extend(rest);
            order = promoted;
        }
        Strategy::Proportional => {}
    }

    order
}
