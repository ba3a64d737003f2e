use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use debtfree_core::math::{
    calculate_affordability, calculate_emi, calculate_total_interest, interest_saved,
    reverse_emi_rate, reverse_emi_tenure, AmortizationSchedule,
};

/// Arguments for EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: u32,

    /// Extra amount paid every month beyond the EMI
    #[arg(long)]
    pub monthly_prepayment: Option<Decimal>,
}

/// Arguments for amortization schedule printing
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: u32,

    /// Extra amount paid every month beyond the EMI
    #[arg(long)]
    pub monthly_prepayment: Option<Decimal>,
}

/// Arguments for reverse rate solving
#[derive(Args)]
pub struct ReverseRateArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Known monthly EMI
    #[arg(long)]
    pub emi: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: u32,
}

/// Arguments for reverse tenure solving
#[derive(Args)]
pub struct TenureArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Known monthly EMI
    #[arg(long)]
    pub emi: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Decimal,
}

/// Arguments for affordability inversion
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Monthly EMI budget
    #[arg(long)]
    pub emi: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: u32,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi = calculate_emi(args.principal, args.rate, args.tenure_months);
    let total_interest = calculate_total_interest(args.principal, args.rate, args.tenure_months);

    let (saved, months_saved) = match args.monthly_prepayment {
        Some(prepayment) if prepayment > Decimal::ZERO => interest_saved(
            args.principal,
            args.rate,
            args.tenure_months,
            prepayment,
            BTreeMap::new(),
        ),
        _ => (Decimal::ZERO, 0),
    };

    Ok(json!({
        "emi": emi,
        "total_interest": total_interest,
        "total_payment": args.principal + total_interest,
        "interest_saved": saved,
        "months_saved": months_saved,
    }))
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule = AmortizationSchedule::new(args.principal, args.rate, args.tenure_months)
        .with_prepayment(args.monthly_prepayment.unwrap_or(Decimal::ZERO));
    let entries: Vec<_> = schedule.collect();
    if entries.is_empty() {
        return Err("Nothing to amortize: check principal and tenure".into());
    }
    Ok(serde_json::to_value(entries)?)
}

pub fn run_reverse_rate(args: ReverseRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = reverse_emi_rate(args.principal, args.emi, args.tenure_months);
    Ok(json!({ "estimated_rate": rate }))
}

pub fn run_tenure(args: TenureArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tenure = reverse_emi_tenure(args.principal, args.emi, args.rate);
    if tenure == 0 {
        return Err(format!(
            "EMI {} can never amortize {} at {}% — it does not cover the interest",
            args.emi, args.principal, args.rate
        )
        .into());
    }
    Ok(json!({ "tenure_months": tenure }))
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let principal = calculate_affordability(args.emi, args.rate, args.tenure_months);
    let total_interest = calculate_total_interest(principal, args.rate, args.tenure_months);
    Ok(json!({
        "max_principal": principal,
        "total_interest": total_interest,
        "total_payment": principal + total_interest,
    }))
}
