//! Fixed loan plan table
//!
//! A plan is a (duration, monthly interest rate) pair chosen at creation.
//! Repayment is computed for a single interest period; later periods accrue
//! through escalation cycles, never at creation.

use serde::{Deserialize, Serialize};

/// Plan identifier accepted at loan creation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanKey {
    #[default]
    Starter,
    Growth,
    Pro,
}

/// A fixed (duration, monthly interest rate) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub name: &'static str,
    pub duration_days: i32,
    /// Monthly interest rate in whole percent
    pub monthly_interest: i32,
}

impl PlanKey {
    pub fn plan(self) -> Plan {
        match self {
            PlanKey::Starter => Plan {
                name: "Starter",
                duration_days: 30,
                monthly_interest: 15,
            },
            PlanKey::Growth => Plan {
                name: "Growth",
                duration_days: 60,
                monthly_interest: 18,
            },
            PlanKey::Pro => Plan {
                name: "Pro",
                duration_days: 90,
                monthly_interest: 21,
            },
        }
    }
}

/// Principal plus one period of interest, rounded to the nearest unit.
pub fn single_period_repayment(amount: i64, monthly_interest: i32) -> i64 {
    amount + (amount * monthly_interest as i64 + 50) / 100
}
