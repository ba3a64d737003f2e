//! Indian slab tax, loan deduction caps, and regulator penalty rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::loan::{LoanKind, RateKind};
use crate::math::emi::round_money;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Prepayment / foreclosure rules
// ---------------------------------------------------------------------------

/// The regulator mandates zero prepayment penalty on floating-rate loans.
pub const FLOATING_RATE_PREPAYMENT_PENALTY: Decimal = Decimal::ZERO;

/// Typical foreclosure charge (percent) by product and rate contract.
pub fn foreclosure_charge(kind: LoanKind, rate_kind: RateKind) -> Rate {
    match (kind, rate_kind) {
        (LoanKind::Home, RateKind::Floating) => Decimal::ZERO,
        (LoanKind::Home, RateKind::Fixed) => dec!(2.0),
        (LoanKind::Home, RateKind::Hybrid) => dec!(1.5),
        (LoanKind::Personal, RateKind::Floating) => dec!(2.0),
        (LoanKind::Personal, RateKind::Fixed) => dec!(4.0),
        (LoanKind::Personal, RateKind::Hybrid) => dec!(3.0),
        (LoanKind::Car, RateKind::Floating) => Decimal::ZERO,
        (LoanKind::Car, RateKind::Fixed) => dec!(5.0),
        (LoanKind::Car, RateKind::Hybrid) => dec!(2.5),
        (LoanKind::Education, RateKind::Floating) => Decimal::ZERO,
        (LoanKind::Education, RateKind::Fixed) => dec!(1.0),
        (LoanKind::Education, RateKind::Hybrid) => dec!(0.5),
        (LoanKind::Gold, RateKind::Floating) => dec!(0.5),
        (LoanKind::Gold, RateKind::Fixed) => dec!(1.0),
        (LoanKind::Gold, RateKind::Hybrid) => dec!(0.5),
        (LoanKind::CreditCard, _) => Decimal::ZERO,
    }
}

/// Prepayment penalty (percent) by product and rate contract.
pub fn prepayment_penalty(kind: LoanKind, rate_kind: RateKind) -> Rate {
    if rate_kind == RateKind::Floating {
        return FLOATING_RATE_PREPAYMENT_PENALTY;
    }
    foreclosure_charge(kind, rate_kind)
}

// ---------------------------------------------------------------------------
// Slab tax
// ---------------------------------------------------------------------------

/// FY 2024-25 slabs as (upper_bound, marginal_rate) pairs.
const OLD_REGIME_SLABS: [(Decimal, Decimal); 4] = [
    (dec!(250_000), dec!(0)),
    (dec!(500_000), dec!(0.05)),
    (dec!(1_000_000), dec!(0.20)),
    (dec!(99_999_999), dec!(0.30)),
];

const NEW_REGIME_SLABS: [(Decimal, Decimal); 6] = [
    (dec!(300_000), dec!(0)),
    (dec!(700_000), dec!(0.05)),
    (dec!(1_000_000), dec!(0.10)),
    (dec!(1_200_000), dec!(0.15)),
    (dec!(1_500_000), dec!(0.20)),
    (dec!(99_999_999), dec!(0.30)),
];

/// Which Indian regime's slab table and deduction rules to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Old,
    New,
}

fn slabs_for(regime: Regime) -> &'static [(Decimal, Decimal)] {
    match regime {
        Regime::Old => &OLD_REGIME_SLABS,
        Regime::New => &NEW_REGIME_SLABS,
    }
}

/// Progressive slab tax on a taxable income.
pub fn slab_tax(income: Money, regime: Regime) -> Money {
    let mut tax = Decimal::ZERO;
    let mut prev_limit = Decimal::ZERO;

    for &(limit, rate) in slabs_for(regime) {
        if income <= prev_limit {
            break;
        }
        let taxable = income.min(limit) - prev_limit;
        tax += taxable * rate;
        prev_limit = limit;
    }

    round_money(tax)
}

/// Marginal tax bracket for a given income, as a fraction (0.30 = 30%).
pub fn marginal_bracket(annual_income: Money, regime: Regime) -> Rate {
    let mut bracket = Decimal::ZERO;
    let mut prev_limit = Decimal::ZERO;

    for &(limit, rate) in slabs_for(regime) {
        if annual_income > prev_limit {
            bracket = rate;
        }
        prev_limit = limit;
    }

    bracket
}

// ---------------------------------------------------------------------------
// Loan deductions
// ---------------------------------------------------------------------------

/// Annual statutory caps on loan-linked deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionLimits {
    /// Principal repayment category (1.5L).
    pub principal_repayment: Money,
    /// Home-loan interest on a self-occupied property (2L).
    pub home_interest_self_occupied: Money,
    /// First-home buyer additional interest (1.5L).
    pub first_home_interest: Money,
}

impl Default for DeductionLimits {
    fn default() -> Self {
        DeductionLimits {
            principal_repayment: dec!(150_000),
            home_interest_self_occupied: dec!(200_000),
            first_home_interest: dec!(150_000),
        }
    }
}

/// A loan's paid amounts and eligibility for one assessment year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTaxYear {
    pub annual_interest_paid: Money,
    pub annual_principal_paid: Money,
    #[serde(default)]
    pub eligible_interest_deduction: bool,
    #[serde(default)]
    pub eligible_education_deduction: bool,
    #[serde(default)]
    pub eligible_first_home_deduction: bool,
    #[serde(default)]
    pub eligible_principal_deduction: bool,
    /// Lifts the home-interest cap when false (let-out property).
    #[serde(default = "default_self_occupied")]
    pub self_occupied: bool,
}

fn default_self_occupied() -> bool {
    true
}

/// Category-wise deduction totals after caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDeductions {
    pub principal_repayment: Money,
    pub home_interest: Money,
    pub education_interest: Money,
    pub first_home_interest: Money,
    pub total: Money,
}

impl LoanDeductions {
    pub const ZERO: LoanDeductions = LoanDeductions {
        principal_repayment: Decimal::ZERO,
        home_interest: Decimal::ZERO,
        education_interest: Decimal::ZERO,
        first_home_interest: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Total deductions claimable from a set of loans. The new regime
/// returns zeros — it admits none of these categories.
pub fn calculate_loan_deductions(loans: &[LoanTaxYear], regime: Regime) -> LoanDeductions {
    if regime == Regime::New {
        return LoanDeductions::ZERO;
    }

    let limits = DeductionLimits::default();
    let mut principal = Decimal::ZERO;
    let mut home_interest = Decimal::ZERO;
    let mut education = Decimal::ZERO;
    let mut first_home = Decimal::ZERO;

    for loan in loans {
        if loan.eligible_principal_deduction {
            principal += loan.annual_principal_paid;
        }
        if loan.eligible_interest_deduction {
            let cap = if loan.self_occupied {
                limits.home_interest_self_occupied
            } else {
                loan.annual_interest_paid
            };
            home_interest += loan.annual_interest_paid.min(cap);
        }
        if loan.eligible_education_deduction {
            // Uncapped, eight-year window
            education += loan.annual_interest_paid;
        }
        if loan.eligible_first_home_deduction {
            first_home += loan.annual_interest_paid;
        }
    }

    let principal_repayment = principal.min(limits.principal_repayment);
    let home_interest = home_interest.min(limits.home_interest_self_occupied);
    let first_home_interest = first_home.min(limits.first_home_interest);
    let total = principal_repayment + home_interest + education + first_home_interest;

    LoanDeductions {
        principal_repayment,
        home_interest,
        education_interest: education,
        first_home_interest,
        total,
    }
}

// ---------------------------------------------------------------------------
// Regime comparison
// ---------------------------------------------------------------------------

/// Tax position under one regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimePosition {
    pub taxable_income: Money,
    pub tax: Money,
    pub deductions: LoanDeductions,
}

/// Old-vs-new regime comparison for a filer with loans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old_regime: RegimePosition,
    pub new_regime: RegimePosition,
    pub recommended: Regime,
    pub savings: Money,
}

/// Compare the two regimes, loan deductions included.
pub fn compare_regimes(annual_income: Money, loans: &[LoanTaxYear]) -> RegimeComparison {
    let old_deductions = calculate_loan_deductions(loans, Regime::Old);
    let old_taxable = (annual_income - old_deductions.total).max(Decimal::ZERO);
    let old_tax = slab_tax(old_taxable, Regime::Old);

    let new_deductions = calculate_loan_deductions(loans, Regime::New);
    let new_taxable = (annual_income - new_deductions.total).max(Decimal::ZERO);
    let new_tax = slab_tax(new_taxable, Regime::New);

    let recommended = if old_tax <= new_tax {
        Regime::Old
    } else {
        Regime::New
    };

    RegimeComparison {
        old_regime: RegimePosition {
            taxable_income: old_taxable,
            tax: old_tax,
            deductions: old_deductions,
        },
        new_regime: RegimePosition {
            taxable_income: new_taxable,
            tax: new_tax,
            deductions: new_deductions,
        },
        recommended,
        savings: (old_tax - new_tax).abs(),
    }
}
