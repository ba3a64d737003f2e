pub mod allocation;
pub mod ranking;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use allocation::{priority_allocation, proportional_split};
pub use ranking::{effective_rate, priority_order, QUICK_WIN_EMI_THRESHOLD};

/// Extra-payment prioritization policy. A closed set — each variant
/// resolves to a pure ranking or allocation function, so there is no
/// open dispatch surface to extend at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    SmartHybrid,
    Avalanche,
    Snowball,
    Proportional,
}

impl Strategy {
    /// Canonical evaluation order; also the final recommendation
    /// tie-break.
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartHybrid,
        Strategy::Avalanche,
        Strategy::Snowball,
        Strategy::Proportional,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Strategy::SmartHybrid => "smart_hybrid",
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
            Strategy::Proportional => "proportional",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::SmartHybrid => {
                "Smart Hybrid — post-tax optimized with quick wins"
            }
            Strategy::Avalanche => "Avalanche — targets the highest rate loan first",
            Strategy::Snowball => "Snowball — eliminates the smallest loan first",
            Strategy::Proportional => {
                "Proportional — distributes extra payment across all loans"
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        assert_eq!(
            Strategy::ALL,
            [
                Strategy::SmartHybrid,
                Strategy::Avalanche,
                Strategy::Snowball,
                Strategy::Proportional,
            ]
        );
    }

    #[test]
    fn test_ids_are_stable() {
        assert_eq!(Strategy::SmartHybrid.id(), "smart_hybrid");
        assert_eq!(Strategy::Avalanche.to_string(), "avalanche");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Strategy::SmartHybrid).unwrap();
        assert_eq!(json, "\"smart_hybrid\"");
    }
}
