use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::loan::Loan;
use crate::math::emi::{monthly_rate, round_money};
use crate::optimizer::engine::{simulate, SimulationRun};
use crate::optimizer::BudgetConfig;
use crate::strategy::Strategy;
use crate::types::{with_metadata, ComputationOutput, Money, MAX_TENURE_MONTHS};
use crate::{DebtFreeError, DebtFreeResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationInput {
    pub loans: Vec<Loan>,
    pub budget: BudgetConfig,
}

/// Per-loan outcome under one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPayoffResult {
    pub loan_id: String,
    /// Simulation month the balance reached zero; None when the run
    /// ended at the cap with the loan still open.
    pub payoff_month: Option<u32>,
    pub months_saved: i64,
}

/// Outcome of one strategy run, diffed against the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub strategy: Strategy,
    pub description: String,
    pub total_interest_paid: Money,
    pub total_months: u32,
    pub interest_saved: Money,
    pub months_saved: i64,
    pub incomplete: bool,
    /// Loan ids in the order their balances reached zero.
    pub payoff_order: Vec<String>,
    pub loan_results: Vec<LoanPayoffResult>,
}

/// The full comparison returned to the caller. A pure computed value
/// with no persistent lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub baseline_total_interest: Money,
    pub baseline_total_months: u32,
    pub baseline_incomplete: bool,
    pub strategies: Vec<StrategyResult>,
    pub recommended: Strategy,
}

/// Condensed savings preview for a single extra-budget figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickCompareOutput {
    pub interest_saved: Money,
    pub months_saved: i64,
    pub debt_free_months: u32,
    pub recommended_strategy: Strategy,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the baseline and all four strategies, diff them, and pick a
/// recommendation.
pub fn optimize(
    input: &OptimizationInput,
) -> DebtFreeResult<ComputationOutput<OptimizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    for loan in &input.loans {
        let first_month_interest =
            round_money(loan.outstanding_principal * monthly_rate(loan.interest_rate));
        if loan.outstanding_principal > Decimal::ZERO && loan.emi_amount <= first_month_interest {
            warnings.push(format!(
                "loan '{}': EMI {} does not cover first-month interest {}; it can only close through extra payments",
                loan.id, loan.emi_amount, first_month_interest
            ));
        }
    }

    let baseline = simulate(&input.loans, &input.budget, None);

    // Each run owns its own snapshot arena, so the four evaluations are
    // independent; the parallel path is a pure speedup.
    #[cfg(feature = "parallel")]
    let runs: Vec<SimulationRun> = Strategy::ALL
        .par_iter()
        .map(|strategy| simulate(&input.loans, &input.budget, Some(*strategy)))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let runs: Vec<SimulationRun> = Strategy::ALL
        .iter()
        .map(|strategy| simulate(&input.loans, &input.budget, Some(*strategy)))
        .collect();

    let strategies: Vec<StrategyResult> = Strategy::ALL
        .iter()
        .zip(runs)
        .map(|(strategy, run)| build_strategy_result(*strategy, run, &baseline, &input.loans))
        .collect();

    for result in &strategies {
        if result.incomplete {
            warnings.push(format!(
                "strategy '{}' did not clear every loan within {} months",
                result.strategy, MAX_TENURE_MONTHS
            ));
        }
    }

    // Greatest interest saved; ties fall to fewer months, then to the
    // canonical order (which is the iteration order).
    let mut best = 0usize;
    for idx in 1..strategies.len() {
        let challenger = &strategies[idx];
        let incumbent = &strategies[best];
        if challenger.interest_saved > incumbent.interest_saved
            || (challenger.interest_saved == incumbent.interest_saved
                && challenger.total_months < incumbent.total_months)
        {
            best = idx;
        }
    }
    let recommended = strategies[best].strategy;

    let output = OptimizationResult {
        baseline_total_interest: baseline.total_interest,
        baseline_total_months: baseline.total_months,
        baseline_incomplete: baseline.incomplete,
        strategies,
        recommended,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_extra": input.budget.monthly_extra.to_string(),
        "tax_bracket": input.budget.tax_bracket.to_string(),
        "regime": input.budget.regime,
        "deduction_weights": input.budget.weights(),
        "month_cap": MAX_TENURE_MONTHS,
    });

    Ok(with_metadata(
        "Multi-strategy debt payoff optimization vs minimum-payment baseline",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Baseline vs. best strategy for a single monthly-extra figure, using
/// the default regime at a 30% bracket.
pub fn quick_compare(
    loans: &[Loan],
    monthly_extra: Money,
) -> DebtFreeResult<ComputationOutput<QuickCompareOutput>> {
    let input = OptimizationInput {
        loans: loans.to_vec(),
        budget: BudgetConfig {
            monthly_extra,
            tax_bracket: dec!(0.30),
            ..BudgetConfig::default()
        },
    };

    let full = optimize(&input)?;
    let recommended = full.result.recommended;
    let best = full
        .result
        .strategies
        .iter()
        .find(|result| result.strategy == recommended)
        .ok_or_else(|| DebtFreeError::InsufficientData("no strategy results produced".into()))?;

    let output = QuickCompareOutput {
        interest_saved: best.interest_saved,
        months_saved: best.months_saved,
        debt_free_months: best.total_months,
        recommended_strategy: recommended,
    };

    let elapsed = full.metadata.computation_time_us;
    let assumptions = serde_json::json!({
        "monthly_extra": monthly_extra.to_string(),
        "tax_bracket": "0.30",
    });

    Ok(with_metadata(
        "Quick savings preview vs minimum-payment baseline",
        &assumptions,
        full.warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &OptimizationInput) -> DebtFreeResult<()> {
    if input.loans.is_empty() {
        return Err(DebtFreeError::InsufficientData(
            "At least one loan is required.".into(),
        ));
    }
    for loan in &input.loans {
        loan.validate()?;
    }

    let budget = &input.budget;
    if budget.monthly_extra < Decimal::ZERO {
        return Err(DebtFreeError::InvalidInput {
            field: "monthly_extra".into(),
            reason: "cannot be negative".into(),
        });
    }
    for lump in &budget.lump_sums {
        if lump.month == 0 || lump.month > MAX_TENURE_MONTHS {
            return Err(DebtFreeError::InvalidInput {
                field: "lump_sums".into(),
                reason: format!("month {} is outside 1..=600", lump.month),
            });
        }
        if lump.amount < Decimal::ZERO {
            return Err(DebtFreeError::InvalidInput {
                field: "lump_sums".into(),
                reason: format!("amount for month {} cannot be negative", lump.month),
            });
        }
    }
    if budget.tax_bracket < Decimal::ZERO || budget.tax_bracket >= Decimal::ONE {
        return Err(DebtFreeError::InvalidInput {
            field: "tax_bracket".into(),
            reason: "must be a fraction in [0, 1)".into(),
        });
    }
    if let Some(weights) = &budget.deduction_weights {
        if weights.interest_weight < Decimal::ZERO || weights.principal_weight < Decimal::ZERO {
            return Err(DebtFreeError::InvalidInput {
                field: "deduction_weights".into(),
                reason: "weights cannot be negative".into(),
            });
        }
    }
    Ok(())
}

fn build_strategy_result(
    strategy: Strategy,
    run: SimulationRun,
    baseline: &SimulationRun,
    loans: &[Loan],
) -> StrategyResult {
    let loan_results = loans
        .iter()
        .enumerate()
        .map(|(i, loan)| {
            let payoff_month = run.snapshots[i].payoff_month;
            let months_saved = match (baseline.snapshots[i].payoff_month, payoff_month) {
                (Some(base), Some(strat)) => i64::from(base) - i64::from(strat),
                _ => 0,
            };
            LoanPayoffResult {
                loan_id: loan.id.clone(),
                payoff_month,
                months_saved,
            }
        })
        .collect();

    StrategyResult {
        strategy,
        description: strategy.description().to_string(),
        total_interest_paid: run.total_interest,
        total_months: run.total_months,
        interest_saved: baseline.total_interest - run.total_interest,
        months_saved: i64::from(baseline.total_months) - i64::from(run.total_months),
        incomplete: run.incomplete,
        payoff_order: run
            .payoff_order
            .iter()
            .map(|&i| loans[i].id.clone())
            .collect(),
        loan_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanKind, RateKind};
    use crate::math::calculate_emi;

    fn loan(id: &str, balance: Decimal, rate: Decimal, tenure: u32) -> Loan {
        Loan {
            id: id.into(),
            lender: "SBI".into(),
            kind: LoanKind::Personal,
            rate_kind: RateKind::Floating,
            principal_amount: balance.max(dec!(1)),
            outstanding_principal: balance,
            interest_rate: rate,
            tenure_months: tenure,
            remaining_tenure_months: tenure,
            emi_amount: calculate_emi(balance, rate, tenure),
            prepayment_penalty_pct: Decimal::ZERO,
            foreclosure_charges_pct: Decimal::ZERO,
            eligible_interest_deduction: false,
            eligible_education_deduction: false,
            eligible_first_home_deduction: false,
            eligible_principal_deduction: false,
        }
    }

    fn sample_input() -> OptimizationInput {
        OptimizationInput {
            loans: vec![
                loan("home", dec!(2_000_000), dec!(8.5), 240),
                loan("personal", dec!(400_000), dec!(14), 48),
            ],
            budget: BudgetConfig {
                monthly_extra: dec!(20_000),
                ..BudgetConfig::default()
            },
        }
    }

    #[test]
    fn test_optimize_produces_all_strategies() {
        let output = optimize(&sample_input()).unwrap();
        assert_eq!(output.result.strategies.len(), 4);
        let ids: Vec<&str> = output
            .result
            .strategies
            .iter()
            .map(|result| result.strategy.id())
            .collect();
        assert_eq!(
            ids,
            vec!["smart_hybrid", "avalanche", "snowball", "proportional"]
        );
    }

    #[test]
    fn test_no_strategy_worse_than_baseline() {
        let output = optimize(&sample_input()).unwrap();
        for result in &output.result.strategies {
            assert!(
                result.interest_saved >= Decimal::ZERO,
                "{} paid more interest than baseline",
                result.strategy
            );
            assert!(result.total_months <= output.result.baseline_total_months);
        }
    }

    #[test]
    fn test_empty_loans_rejected() {
        let input = OptimizationInput {
            loans: vec![],
            budget: BudgetConfig::default(),
        };
        match optimize(&input).unwrap_err() {
            DebtFreeError::InsufficientData(_) => {}
            other => panic!("Expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_loan_rejected_before_simulation() {
        let mut input = sample_input();
        input.loans[0].interest_rate = dec!(60);
        assert!(optimize(&input).is_err());
    }

    #[test]
    fn test_invalid_tax_bracket_rejected() {
        let mut input = sample_input();
        input.budget.tax_bracket = Decimal::ONE;
        assert!(optimize(&input).is_err());
    }

    #[test]
    fn test_non_amortizing_emi_warns() {
        let mut input = sample_input();
        input.loans[1].emi_amount = dec!(100); // below first-month interest
        let output = optimize(&input).unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("personal")));
    }

    #[test]
    fn test_recommendation_is_best_interest_saver() {
        let output = optimize(&sample_input()).unwrap();
        let recommended = output.result.recommended;
        let best_saved = output
            .result
            .strategies
            .iter()
            .map(|result| result.interest_saved)
            .max()
            .unwrap();
        let chosen = output
            .result
            .strategies
            .iter()
            .find(|result| result.strategy == recommended)
            .unwrap();
        assert_eq!(chosen.interest_saved, best_saved);
    }

    #[test]
    fn test_zero_extra_budget_ties_recommend_canonical_first() {
        // A single loan with no extra budget leaves nothing to relay, so
        // every strategy equals the baseline and the canonical first wins
        let input = OptimizationInput {
            loans: vec![loan("only", dec!(1_000_000), dec!(10), 120)],
            budget: BudgetConfig::default(),
        };
        let output = optimize(&input).unwrap();
        assert_eq!(output.result.recommended, Strategy::SmartHybrid);
        for result in &output.result.strategies {
            assert_eq!(result.interest_saved, Decimal::ZERO);
            assert_eq!(result.months_saved, 0);
        }
    }

    #[test]
    fn test_quick_compare_shape() {
        let loans = sample_input().loans;
        let output = quick_compare(&loans, dec!(15_000)).unwrap();
        assert!(output.result.interest_saved > Decimal::ZERO);
        assert!(output.result.months_saved > 0);
        assert!(output.result.debt_free_months > 0);
    }

    #[test]
    fn test_metadata_populated() {
        let output = optimize(&sample_input()).unwrap();
        assert!(!output.methodology.is_empty());
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }
}
