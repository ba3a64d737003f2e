mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::emi::{AffordabilityArgs, AmortizeArgs, EmiArgs, ReverseRateArgs, TenureArgs};
use commands::optimizer::{OptimizeArgs, QuickCompareArgs};
use commands::tax::{TaxBracketArgs, TaxCompareArgs};

/// Debt payoff planning with decimal precision
#[derive(Parser)]
#[command(
    name = "dfo",
    version,
    about = "Debt payoff planning with decimal precision",
    long_about = "A CLI for EMI math and multi-loan payoff optimization. \
                  Computes amortization schedules, reverse-solves rates and \
                  tenures, and compares avalanche, snowball, smart-hybrid and \
                  proportional prepayment strategies against a minimum-payment \
                  baseline."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the EMI for a loan, with optional prepayment savings
    Emi(EmiArgs),
    /// Print a month-by-month amortization schedule
    Amortize(AmortizeArgs),
    /// Recover the interest rate implied by a known EMI
    ReverseRate(ReverseRateArgs),
    /// Recover the tenure implied by a known EMI and rate
    Tenure(TenureArgs),
    /// Maximum principal serviceable by an EMI budget
    Affordability(AffordabilityArgs),
    /// Compare payoff strategies for a loan portfolio
    Optimize(OptimizeArgs),
    /// Quick savings preview for a monthly extra amount
    QuickCompare(QuickCompareArgs),
    /// Marginal tax bracket for an income
    TaxBracket(TaxBracketArgs),
    /// Compare tax regimes or deduction approaches with loans
    TaxCompare(TaxCompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Amortize(args) => commands::emi::run_amortize(args),
        Commands::ReverseRate(args) => commands::emi::run_reverse_rate(args),
        Commands::Tenure(args) => commands::emi::run_tenure(args),
        Commands::Affordability(args) => commands::emi::run_affordability(args),
        Commands::Optimize(args) => commands::optimizer::run_optimize(args),
        Commands::QuickCompare(args) => commands::optimizer::run_quick_compare(args),
        Commands::TaxBracket(args) => commands::tax::run_tax_bracket(args),
        Commands::TaxCompare(args) => commands::tax::run_tax_compare(args),
        Commands::Version => {
            println!("dfo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
