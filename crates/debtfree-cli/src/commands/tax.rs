use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use debtfree_core::tax::{india, us};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Country {
    In,
    Us,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IndianRegime {
    Old,
    New,
}

impl From<IndianRegime> for india::Regime {
    fn from(value: IndianRegime) -> Self {
        match value {
            IndianRegime::Old => india::Regime::Old,
            IndianRegime::New => india::Regime::New,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Filing {
    Single,
    MarriedJointly,
    MarriedSeparately,
    HeadOfHousehold,
}

impl From<Filing> for us::FilingStatus {
    fn from(value: Filing) -> Self {
        match value {
            Filing::Single => us::FilingStatus::Single,
            Filing::MarriedJointly => us::FilingStatus::MarriedJointly,
            Filing::MarriedSeparately => us::FilingStatus::MarriedSeparately,
            Filing::HeadOfHousehold => us::FilingStatus::HeadOfHousehold,
        }
    }
}

/// Arguments for the marginal bracket lookup
#[derive(Args)]
pub struct TaxBracketArgs {
    /// Country whose slab tables apply
    #[arg(long)]
    pub country: Country,

    /// Gross annual income in local currency
    #[arg(long)]
    pub income: Decimal,

    /// Indian regime (country = in)
    #[arg(long, default_value = "old")]
    pub regime: IndianRegime,

    /// US filing status (country = us)
    #[arg(long, default_value = "single")]
    pub filing_status: Filing,
}

/// Arguments for the regime / deduction-approach comparison
#[derive(Args)]
pub struct TaxCompareArgs {
    /// Country whose rules apply
    #[arg(long)]
    pub country: Country,

    /// Gross annual income in local currency
    #[arg(long)]
    pub income: Decimal,

    /// Path to a JSON file holding the loans' tax-year figures
    #[arg(long)]
    pub input: Option<String>,

    /// US filing status (country = us)
    #[arg(long, default_value = "single")]
    pub filing_status: Filing,

    /// Non-loan itemized deductions (country = us)
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub other_itemized: Decimal,
}

pub fn run_tax_bracket(args: TaxBracketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bracket = match args.country {
        Country::In => india::marginal_bracket(args.income, args.regime.into()),
        Country::Us => us::marginal_bracket(args.income, args.filing_status.into()),
    };
    Ok(json!({ "bracket": bracket }))
}

pub fn run_tax_compare(args: TaxCompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.country {
        Country::In => {
            let loans: Vec<india::LoanTaxYear> = read_loans(args.input.as_deref())?;
            let comparison = india::compare_regimes(args.income, &loans);
            Ok(serde_json::to_value(&comparison)?)
        }
        Country::Us => {
            let loans: Vec<us::UsLoanTaxYear> = read_loans(args.input.as_deref())?;
            let comparison = us::compare_standard_vs_itemized(
                args.income,
                &loans,
                args.filing_status.into(),
                args.other_itemized,
            );
            Ok(serde_json::to_value(&comparison)?)
        }
    }
}

fn read_loans<T: serde::de::DeserializeOwned>(
    path: Option<&str>,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    // Comparing with no loans is legitimate: standard vs itemized still
    // differs through other deductions
    Ok(Vec::new())
}
