pub mod amortization;
pub mod emi;

pub use amortization::{interest_saved, AmortizationEntry, AmortizationSchedule};
pub use emi::{
    calculate_affordability, calculate_emi, calculate_total_interest, months_to_payoff,
    reverse_emi_rate, reverse_emi_tenure,
};
