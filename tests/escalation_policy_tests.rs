//! Interest escalation policy tests
//!
//! These validate the tier ladder and the recomputation rules without
//! touching a database.

use chrono::{Duration, TimeZone, Utc};

use loandesk_server::loan::escalation::{apply, next_tier, INTEREST_TIERS, RATE_CEILING};
use loandesk_server::loan::plan::{single_period_repayment, PlanKey};

// ============================================================================
// Tier ladder
// ============================================================================

#[test]
fn test_tiers_are_ordered_and_bounded() {
    assert_eq!(INTEREST_TIERS, [15, 18, 21]);
    assert_eq!(*INTEREST_TIERS.last().unwrap(), RATE_CEILING);
}

#[test]
fn test_ladder_walks_every_tier_without_skipping() {
    assert_eq!(next_tier(15), Some(18));
    assert_eq!(next_tier(18), Some(21));
    assert_eq!(next_tier(21), None);
}

#[test]
fn test_rates_are_monotonic_over_successive_cycles() {
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut rate = 15;
    let mut rates = vec![rate];

    let mut current_due = due;
    while let Some(outcome) = apply(10_000, rate, current_due, 30) {
        assert!(outcome.new_rate > rate, "rate must never decrease");
        rate = outcome.new_rate;
        current_due = outcome.new_due_date;
        rates.push(rate);
    }

    assert_eq!(rates, vec![15, 18, 21]);
    assert!(rates.iter().all(|&r| r <= RATE_CEILING));
}

// ============================================================================
// Recomputation
// ============================================================================

#[test]
fn test_escalation_recomputation_example() {
    // Loan of 10000 at 15%, due in 5 days: after one cycle the rate is 18%,
    // repayment 11800, and the due date extends from the scheduled date.
    let due = Utc::now() + Duration::days(5);
    let outcome = apply(10_000, 15, due, 30).unwrap();

    assert_eq!(outcome.new_rate, 18);
    assert_eq!(outcome.new_total_repayment, 11_800);
    assert_eq!(outcome.new_due_date, due + Duration::days(30));
}

#[test]
fn test_due_date_anchor_is_scheduled_not_now() {
    // A due date far in the past still anchors the extension: a late
    // operator action grants no extra grace days.
    let overdue_since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let outcome = apply(10_000, 15, overdue_since, 30).unwrap();

    assert_eq!(outcome.new_due_date, overdue_since + Duration::days(30));
    assert!(outcome.new_due_date < Utc::now());
}

#[test]
fn test_repayment_is_flat_per_period() {
    // Each tier recomputes from the principal; escalating twice must not
    // compound the 18% result into the 21% one.
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let first = apply(100_000, 15, due, 30).unwrap();
    let second = apply(100_000, first.new_rate, first.new_due_date, 30).unwrap();

    assert_eq!(first.new_total_repayment, 118_000);
    assert_eq!(second.new_total_repayment, 121_000);
}

#[test]
fn test_ceiling_blocks_further_escalation() {
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    assert!(apply(10_000, RATE_CEILING, due, 30).is_none());
}

#[test]
fn test_repayment_at_least_principal_for_all_plans() {
    for key in [PlanKey::Starter, PlanKey::Growth, PlanKey::Pro] {
        let plan = key.plan();
        for amount in [5_000i64, 50_000, 999_995, 1_000_000] {
            assert!(single_period_repayment(amount, plan.monthly_interest) >= amount);
        }
    }
}

#[test]
fn test_plan_durations_drive_extension_length() {
    let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

    for key in [PlanKey::Starter, PlanKey::Growth, PlanKey::Pro] {
        let plan = key.plan();
        if let Some(outcome) = apply(10_000, 15, due, plan.duration_days) {
            assert_eq!(
                outcome.new_due_date,
                due + Duration::days(plan.duration_days as i64)
            );
        }
    }
}
