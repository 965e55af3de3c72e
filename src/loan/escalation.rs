//! Interest escalation policy
//!
//! Applied when an interest period elapses without full repayment: the rate
//! advances one tier, the due date extends from the scheduled due date, and
//! the repayment amount is recomputed flat for the new rate. The final
//! deadline never moves; it is the hard outer repayment bound fixed at
//! approval.

use chrono::{DateTime, Duration, Utc};

use super::plan::single_period_repayment;

/// Ordered interest tiers in whole percent. The next tier is strictly the
/// successor of the current one; rates never decrease and never skip.
pub const INTEREST_TIERS: [i32; 3] = [15, 18, 21];

/// Rate ceiling. A loan at this rate cannot escalate further; the caller is
/// expected to demand full repayment instead.
pub const RATE_CEILING: i32 = 21;

/// The state written back by one escalation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationOutcome {
    pub new_rate: i32,
    pub new_due_date: DateTime<Utc>,
    pub new_total_repayment: i64,
}

/// Next tier above the given rate, or None at (or past) the ceiling.
pub fn next_tier(current_rate: i32) -> Option<i32> {
    if current_rate >= RATE_CEILING {
        return None;
    }
    INTEREST_TIERS.iter().copied().find(|&t| t > current_rate)
}

/// Compute one escalation cycle.
///
/// The new due date extends from the scheduled due date, not from "now", so a
/// late operator action does not silently grant extra grace days. Repayment
/// is a fresh single-period computation at the new rate; tiers do not
/// compound.
pub fn apply(
    amount: i64,
    current_rate: i32,
    due_date: DateTime<Utc>,
    duration_days: i32,
) -> Option<EscalationOutcome> {
    let new_rate = next_tier(current_rate)?;

    Some(EscalationOutcome {
        new_rate,
        new_due_date: due_date + Duration::days(duration_days as i64),
        new_total_repayment: single_period_repayment(amount, new_rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_tier_ladder() {
        assert_eq!(next_tier(15), Some(18));
        assert_eq!(next_tier(18), Some(21));
        assert_eq!(next_tier(21), None);
    }

    #[test]
    fn test_next_tier_never_decreases() {
        let mut rate = INTEREST_TIERS[0];
        while let Some(next) = next_tier(rate) {
            assert!(next > rate);
            rate = next;
        }
        assert_eq!(rate, RATE_CEILING);
    }

    #[test]
    fn test_next_tier_past_ceiling() {
        assert_eq!(next_tier(22), None);
        assert_eq!(next_tier(100), None);
    }

    #[test]
    fn test_apply_extends_from_scheduled_due_date() {
        let due = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let outcome = apply(10_000, 15, due, 30).unwrap();

        assert_eq!(outcome.new_rate, 18);
        assert_eq!(outcome.new_due_date, due + Duration::days(30));
        assert_eq!(outcome.new_total_repayment, 11_800);
    }

    #[test]
    fn test_apply_flat_recomputation_not_compounding() {
        let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let first = apply(10_000, 15, due, 30).unwrap();
        let second = apply(10_000, first.new_rate, first.new_due_date, 30).unwrap();

        // 21% of the principal, not 21% of the escalated balance
        assert_eq!(second.new_total_repayment, 12_100);
        assert_eq!(second.new_due_date, due + Duration::days(60));
    }

    #[test]
    fn test_apply_at_ceiling_is_none() {
        let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(apply(10_000, 21, due, 30).is_none());
    }
}
