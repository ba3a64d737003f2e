//! US federal brackets, standard deduction, and loan deduction rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::math::emi::round_money;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Brackets and standard deduction (2024)
// ---------------------------------------------------------------------------

/// Federal filing status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJointly,
    MarriedSeparately,
    HeadOfHousehold,
}

const SINGLE_BRACKETS: [(Decimal, Decimal); 7] = [
    (dec!(11_600), dec!(0.10)),
    (dec!(47_150), dec!(0.12)),
    (dec!(100_525), dec!(0.22)),
    (dec!(191_950), dec!(0.24)),
    (dec!(243_725), dec!(0.32)),
    (dec!(609_350), dec!(0.35)),
    (dec!(99_999_999), dec!(0.37)),
];

const MARRIED_JOINTLY_BRACKETS: [(Decimal, Decimal); 7] = [
    (dec!(23_200), dec!(0.10)),
    (dec!(94_300), dec!(0.12)),
    (dec!(201_050), dec!(0.22)),
    (dec!(383_900), dec!(0.24)),
    (dec!(487_450), dec!(0.32)),
    (dec!(731_200), dec!(0.35)),
    (dec!(99_999_999), dec!(0.37)),
];

const MARRIED_SEPARATELY_BRACKETS: [(Decimal, Decimal); 7] = [
    (dec!(11_600), dec!(0.10)),
    (dec!(47_150), dec!(0.12)),
    (dec!(100_525), dec!(0.22)),
    (dec!(191_950), dec!(0.24)),
    (dec!(243_725), dec!(0.32)),
    (dec!(365_600), dec!(0.35)),
    (dec!(99_999_999), dec!(0.37)),
];

const HEAD_OF_HOUSEHOLD_BRACKETS: [(Decimal, Decimal); 7] = [
    (dec!(16_550), dec!(0.10)),
    (dec!(63_100), dec!(0.12)),
    (dec!(100_500), dec!(0.22)),
    (dec!(191_950), dec!(0.24)),
    (dec!(243_700), dec!(0.32)),
    (dec!(609_350), dec!(0.35)),
    (dec!(99_999_999), dec!(0.37)),
];

fn brackets_for(status: FilingStatus) -> &'static [(Decimal, Decimal)] {
    match status {
        FilingStatus::Single => &SINGLE_BRACKETS,
        FilingStatus::MarriedJointly => &MARRIED_JOINTLY_BRACKETS,
        FilingStatus::MarriedSeparately => &MARRIED_SEPARATELY_BRACKETS,
        FilingStatus::HeadOfHousehold => &HEAD_OF_HOUSEHOLD_BRACKETS,
    }
}

/// 2024 standard deduction for a filing status.
pub fn standard_deduction(status: FilingStatus) -> Money {
    match status {
        FilingStatus::Single | FilingStatus::MarriedSeparately => dec!(14_600),
        FilingStatus::MarriedJointly => dec!(29_200),
        FilingStatus::HeadOfHousehold => dec!(21_900),
    }
}

/// Mortgage interest is deductible on the first 750K of principal.
pub const MORTGAGE_INTEREST_PRINCIPAL_CAP: Decimal = dec!(750_000);

/// Student-loan interest deduction ceiling (above-the-line).
pub const STUDENT_LOAN_INTEREST_CAP: Decimal = dec!(2_500);

/// Federal income tax on a taxable income.
pub fn federal_tax(taxable_income: Money, status: FilingStatus) -> Money {
    let mut tax = Decimal::ZERO;
    let mut prev_limit = Decimal::ZERO;

    for &(limit, rate) in brackets_for(status) {
        if taxable_income <= prev_limit {
            break;
        }
        let taxable = taxable_income.min(limit) - prev_limit;
        tax += taxable * rate;
        prev_limit = limit;
    }

    round_money(tax)
}

/// Marginal federal bracket for a gross income, as a fraction.
pub fn marginal_bracket(annual_income: Money, status: FilingStatus) -> Rate {
    let mut bracket = Decimal::ZERO;
    let mut prev_limit = Decimal::ZERO;

    for &(limit, rate) in brackets_for(status) {
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

/// A loan's paid amounts and eligibility for one tax year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsLoanTaxYear {
    pub annual_interest_paid: Money,
    /// Used to prorate mortgage interest above the principal cap.
    #[serde(default)]
    pub outstanding_principal: Money,
    #[serde(default)]
    pub eligible_mortgage_deduction: bool,
    #[serde(default)]
    pub eligible_student_loan_deduction: bool,
}

/// Category-wise deduction totals after caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsLoanDeductions {
    pub mortgage_interest: Money,
    pub student_loan_interest: Money,
    /// Deductions that only count when itemizing.
    pub itemizable: Money,
    /// Deductions taken regardless of standard vs itemized.
    pub above_the_line: Money,
}

/// Total deductions claimable from a set of loans.
///
/// Mortgage interest is prorated when the outstanding principal exceeds
/// the 750K cap; student-loan interest is capped at 2,500 and is
/// above-the-line.
pub fn calculate_loan_deductions(loans: &[UsLoanTaxYear]) -> UsLoanDeductions {
    let mut mortgage_interest = Decimal::ZERO;
    let mut student_loan_interest = Decimal::ZERO;

    for loan in loans {
        if loan.eligible_mortgage_deduction {
            let deductible = if loan.outstanding_principal > MORTGAGE_INTEREST_PRINCIPAL_CAP {
                loan.annual_interest_paid * MORTGAGE_INTEREST_PRINCIPAL_CAP
                    / loan.outstanding_principal
            } else {
                loan.annual_interest_paid
            };
            mortgage_interest += deductible;
        }
        if loan.eligible_student_loan_deduction {
            student_loan_interest += loan.annual_interest_paid;
        }
    }

    let student_loan_interest = student_loan_interest.min(STUDENT_LOAN_INTEREST_CAP);

    UsLoanDeductions {
        mortgage_interest,
        student_loan_interest,
        itemizable: mortgage_interest,
        above_the_line: student_loan_interest,
    }
}

// ---------------------------------------------------------------------------
// Standard vs itemized
// ---------------------------------------------------------------------------

/// Tax position under one deduction approach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionPosition {
    pub deduction_amount: Money,
    pub above_the_line: Money,
    pub taxable_income: Money,
    pub tax: Money,
}

/// Deduction approach chosen by the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionApproach {
    Standard,
    Itemized,
}

/// Standard-vs-itemized comparison for a filer with loans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionComparison {
    pub standard: DeductionPosition,
    pub itemized: DeductionPosition,
    pub recommended: DeductionApproach,
    pub savings: Money,
}

/// Compare the standard deduction against itemizing with loan interest.
/// Student-loan interest is above-the-line, so it applies either way.
pub fn compare_standard_vs_itemized(
    annual_income: Money,
    loans: &[UsLoanTaxYear],
    status: FilingStatus,
    other_itemized_deductions: Money,
) -> DeductionComparison {
    let loan_deductions = calculate_loan_deductions(loans);
    let above_the_line = loan_deductions.above_the_line;
    let adjusted_income = (annual_income - above_the_line).max(Decimal::ZERO);

    let std_deduction = standard_deduction(status);
    let std_taxable = (adjusted_income - std_deduction).max(Decimal::ZERO);
    let std_tax = federal_tax(std_taxable, status);

    let total_itemized = loan_deductions.itemizable + other_itemized_deductions;
    let item_taxable = (adjusted_income - total_itemized).max(Decimal::ZERO);
    let item_tax = federal_tax(item_taxable, status);

    let recommended = if std_tax <= item_tax {
        DeductionApproach::Standard
    } else {
        DeductionApproach::Itemized
    };

    DeductionComparison {
        standard: DeductionPosition {
            deduction_amount: std_deduction,
            above_the_line,
            taxable_income: std_taxable,
            tax: std_tax,
        },
        itemized: DeductionPosition {
            deduction_amount: total_itemized,
            above_the_line,
            taxable_income: item_taxable,
            tax: item_tax,
        },
        recommended,
        savings: (std_tax - item_tax).abs(),
    }
}
