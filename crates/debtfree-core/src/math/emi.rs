use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Rate, MAX_TENURE_MONTHS};

const MAX_BISECTION_STEPS: u32 = 100;

/// Bisection tolerance: one whole currency unit of EMI.
const RATE_SEARCH_TOLERANCE: Decimal = Decimal::ONE;

/// Round a monetary amount to the nearest whole currency unit, half-up.
pub(crate) fn round_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an annual percentage rate to a monthly fraction (8.5 → 8.5/1200).
pub(crate) fn monthly_rate(annual_rate_pct: Rate) -> Decimal {
    annual_rate_pct / dec!(1200)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Monthly installment on a reducing-balance loan.
///
/// EMI = P·r·(1+r)^n / ((1+r)^n − 1), r = annual_rate/1200.
///
/// Degenerate inputs (principal ≤ 0, tenure 0) yield 0. A zero rate
/// collapses to simple division. The result is rounded to the nearest
/// whole currency unit.
pub fn calculate_emi(principal: Money, annual_rate_pct: Rate, tenure_months: u32) -> Money {
    if principal <= Decimal::ZERO || tenure_months == 0 {
        return Decimal::ZERO;
    }
    if annual_rate_pct.is_zero() {
        return round_money(principal / Decimal::from(tenure_months));
    }

    let r = monthly_rate(annual_rate_pct);
    let factor = compound(r, tenure_months);
    round_money(principal * r * factor / (factor - Decimal::ONE))
}

/// Total interest paid over the scheduled life of a loan: EMI·n − P.
pub fn calculate_total_interest(principal: Money, annual_rate_pct: Rate, tenure_months: u32) -> Money {
    let emi = calculate_emi(principal, annual_rate_pct, tenure_months);
    round_money(emi * Decimal::from(tenure_months) - principal)
}

/// Maximum principal serviceable by a given EMI budget.
///
/// Inverse of the EMI formula: P = EMI·((1+r)^n − 1) / (r·(1+r)^n).
pub fn calculate_affordability(emi: Money, annual_rate_pct: Rate, tenure_months: u32) -> Money {
    if emi <= Decimal::ZERO || tenure_months == 0 {
        return Decimal::ZERO;
    }
    if annual_rate_pct.is_zero() {
        return round_money(emi * Decimal::from(tenure_months));
    }

    let r = monthly_rate(annual_rate_pct);
    let factor = compound(r, tenure_months);
    round_money(emi * (factor - Decimal::ONE) / (r * factor))
}

/// Recover the annual rate implied by a known EMI via bisection over
/// [0.01, 50] percent.
///
/// `calculate_emi` is monotone increasing in the rate for fixed
/// principal and tenure, so plain bisection converges. The rate
/// variable itself runs on f64 — an accepted precision tradeoff, since
/// the answer is quoted to two decimal places and the money-side
/// evaluation stays in Decimal. After 100 steps the best midpoint is
/// returned rather than an error.
pub fn reverse_emi_rate(principal: Money, emi: Money, tenure_months: u32) -> Rate {
    if principal <= Decimal::ZERO || emi <= Decimal::ZERO || tenure_months == 0 {
        return Decimal::ZERO;
    }

    let mut low = 0.01_f64;
    let mut high = 50.0_f64;
    let mut mid = (low + high) / 2.0;

    for _ in 0..MAX_BISECTION_STEPS {
        mid = (low + high) / 2.0;
        let mid_rate = Decimal::from_f64(mid).unwrap_or_default();
        let candidate = calculate_emi(principal, mid_rate, tenure_months);

        if (candidate - emi).abs() <= RATE_SEARCH_TOLERANCE {
            break;
        }
        if candidate < emi {
            low = mid;
        } else {
            high = mid;
        }
    }

    Decimal::from_f64(mid)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of months needed to retire a principal at a given EMI and rate.
///
/// Closed form n = ln(EMI / (EMI − P·r)) / ln(1 + r); returns 0 when the
/// EMI can never amortize the principal. The logarithms run on f64 — the
/// result is rounded to a whole month count, so Decimal-exact evaluation
/// buys nothing here.
pub fn reverse_emi_tenure(principal: Money, emi: Money, annual_rate_pct: Rate) -> u32 {
    if principal <= Decimal::ZERO || emi <= Decimal::ZERO {
        return 0;
    }
    if annual_rate_pct.is_zero() {
        return round_money(principal / emi).to_u32().unwrap_or(0).max(1);
    }

    let r = monthly_rate(annual_rate_pct);
    let denominator = emi - principal * r;
    if denominator <= Decimal::ZERO {
        return 0;
    }

    let ratio = match (emi / denominator).to_f64() {
        Some(v) if v > 0.0 => v,
        _ => return 0,
    };
    let growth = match (Decimal::ONE + r).to_f64() {
        Some(v) if v > 1.0 => v,
        _ => return 0,
    };

    let n = ratio.ln() / growth.ln();
    (n.round() as u32).max(1)
}

/// Months until a balance reaches zero at a fixed monthly payment, or
/// `None` when the payment does not amortize it within the 600-month cap.
pub fn months_to_payoff(balance: Money, annual_rate_pct: Rate, monthly_payment: Money) -> Option<u32> {
    if balance <= Decimal::ZERO {
        return Some(0);
    }
    if monthly_payment <= Decimal::ZERO {
        return None;
    }

    let r = monthly_rate(annual_rate_pct);
    let mut remaining = balance;
    let mut months = 0u32;

    while remaining > Decimal::ZERO && months < MAX_TENURE_MONTHS {
        let interest = remaining * r;
        let principal = monthly_payment - interest;
        if principal <= Decimal::ZERO {
            return None;
        }
        remaining -= principal;
        months += 1;
    }

    (remaining <= Decimal::ZERO).then_some(months)
}
