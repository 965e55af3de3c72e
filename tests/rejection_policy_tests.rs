//! Rejection counting and suspension policy tests

use chrono::NaiveDate;

use loandesk_server::risk::policy::on_rejection;
use loandesk_server::risk::SUSPENSION_THRESHOLD;

fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, d).unwrap()
}

#[test]
fn test_first_rejection_today_counts_one() {
    let outcome = on_rejection(0, None, day(6, 1));
    assert_eq!(outcome.rejection_count, 1);
    assert!(!outcome.suspend);
}

#[test]
fn test_second_same_day_rejection_suspends() {
    let first = on_rejection(0, None, day(6, 1));
    let second = on_rejection(first.rejection_count, Some(day(6, 1)), day(6, 1));

    assert_eq!(second.rejection_count, 2);
    assert!(second.suspend);
}

#[test]
fn test_new_calendar_day_resets_to_one() {
    // One rejection yesterday, next one today: the counter starts over.
    let outcome = on_rejection(1, Some(day(6, 1)), day(6, 2));
    assert_eq!(outcome.rejection_count, 1);
    assert!(!outcome.suspend);
}

#[test]
fn test_stale_counter_from_last_month_resets() {
    let outcome = on_rejection(5, Some(day(5, 14)), day(6, 2));
    assert_eq!(outcome.rejection_count, 1);
    assert!(!outcome.suspend);
}

#[test]
fn test_threshold_is_two() {
    assert_eq!(SUSPENSION_THRESHOLD, 2);
}

#[test]
fn test_counter_is_monotonic_within_a_day() {
    let today = day(6, 1);
    let mut count = 0;
    for expected in 1..=5 {
        let outcome = on_rejection(count, (count > 0).then_some(today), today);
        assert_eq!(outcome.rejection_count, expected);
        assert_eq!(outcome.suspend, expected >= SUSPENSION_THRESHOLD);
        count = outcome.rejection_count;
    }
}
