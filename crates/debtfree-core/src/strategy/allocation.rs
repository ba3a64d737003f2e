use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::loan::Loan;
use crate::optimizer::snapshot::LoanSnapshot;
use crate::types::Money;

/// Gross extra payment needed to drive a balance to zero when a
/// prepayment penalty consumes `penalty_pct` percent of every payment.
pub(crate) fn gross_to_close(balance: Money, penalty_pct: Decimal) -> Money {
    if penalty_pct <= Decimal::ZERO {
        return balance;
    }
    balance / (Decimal::ONE - penalty_pct / dec!(100))
}

/// Walk a priority order, allocating budget one loan at a time.
///
/// Each loan receives at most what it takes to close it (gross of its
/// prepayment penalty); the excess carries over to the next loan in the
/// order. Amounts are gross — the engine applies the penalty friction
/// when it reduces balances. The sum of allocations never exceeds the
/// budget.
pub fn priority_allocation(
    order: &[usize],
    loans: &[Loan],
    snapshots: &[LoanSnapshot],
    budget: Money,
) -> Vec<(usize, Money)> {
    let mut allocations = Vec::new();
    if budget <= Decimal::ZERO {
        return allocations;
    }

    let mut remaining = budget;
    for &i in order {
        if remaining <= Decimal::ZERO {
            break;
        }
        if !snapshots[i].is_active() {
            continue;
        }
        let need = gross_to_close(snapshots[i].balance, loans[i].prepayment_penalty_pct);
        let amount = remaining.min(need);
        if amount > Decimal::ZERO {
            allocations.push((i, amount));
            remaining -= amount;
        }
    }

    allocations
}

/// Split a budget across all active loans pro-rata by balance share.
///
/// Shares floor to whole currency units and are capped at each loan's
/// balance, so the sum never exceeds the budget and no loan is overpaid.
/// The rounding remainder goes to the largest-balance loan; whatever its
/// balance cannot absorb spills to the next-largest, and anything left
/// after every loan is saturated stays unspent.
pub fn proportional_split(snapshots: &[LoanSnapshot], budget: Money) -> Vec<(usize, Money)> {
    if budget <= Decimal::ZERO {
        return Vec::new();
    }

    let active: Vec<usize> = snapshots
        .iter()
        .enumerate()
        .filter(|(_, snap)| snap.is_active() && snap.balance > Decimal::ZERO)
        .map(|(i, _)| i)
        .collect();
    let total_balance: Money = active.iter().map(|&i| snapshots[i].balance).sum();
    if total_balance <= Decimal::ZERO {
        return Vec::new();
    }

    let mut allocations: Vec<(usize, Money)> = Vec::with_capacity(active.len());
    let mut allocated = Decimal::ZERO;
    for &i in &active {
        let share = (budget * snapshots[i].balance / total_balance).floor();
        let amount = share.min(snapshots[i].balance);
        allocations.push((i, amount));
        allocated += amount;
    }

    // Remainder to the largest balance, capped, spilling to the next
    let mut remainder = budget - allocated;
    if remainder > Decimal::ZERO {
        let mut by_balance: Vec<usize> = (0..allocations.len()).collect();
        by_balance.sort_by(|&a, &b| {
            snapshots[allocations[b].0]
                .balance
                .cmp(&snapshots[allocations[a].0].balance)
        });
        for pos in by_balance {
            if remainder <= Decimal::ZERO {
                break;
            }
            let i = allocations[pos].0;
            let headroom = snapshots[i].balance - allocations[pos].1;
            let top_up = remainder.min(headroom);
            if top_up > Decimal::ZERO {
                allocations[pos].1 += top_up;
                remainder -= top_up;
            }
        }
    }

    allocations.retain(|&(_, amount)| amount > Decimal::ZERO);
    allocations
}
