use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debtfree_core::loan::Loan;
use debtfree_core::optimizer::{optimize, quick_compare, OptimizationInput};

use crate::input;

/// Arguments for the full strategy comparison
#[derive(Args)]
pub struct OptimizeArgs {
    /// Path to a JSON file holding {"loans": [...], "budget": {...}}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the quick savings preview
#[derive(Args)]
pub struct QuickCompareArgs {
    /// Path to a JSON file holding an array of loans
    #[arg(long)]
    pub input: Option<String>,

    /// Extra amount available every month
    #[arg(long)]
    pub monthly_extra: Decimal,
}

pub fn run_optimize(args: OptimizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let optimization_input: OptimizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("Provide --input <file> or pipe JSON on stdin".into());
    };

    let output = optimize(&optimization_input)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_quick_compare(args: QuickCompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loans: Vec<Loan> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("Provide --input <file> or pipe a JSON loan array on stdin".into());
    };

    let output = quick_compare(&loans, args.monthly_extra)?;
    Ok(serde_json::to_value(&output)?)
}
