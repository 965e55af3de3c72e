//! Pure rejection-counting decision

use chrono::NaiveDate;

/// Rejections within one calendar day that trigger suspension
pub const SUSPENSION_THRESHOLD: i32 = 2;

/// Decision produced by one rejection event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectionOutcome {
    /// New value of the rolling same-day counter
    pub rejection_count: i32,
    /// Whether the customer must be suspended
    pub suspend: bool,
}

/// Apply one rejection to the customer's rolling daily counter.
///
/// A rejection on the same calendar day as the previous one increments the
/// counter; a rejection on a new day resets it to 1.
pub fn on_rejection(
    prev_count: i32,
    last_rejection_date: Option<NaiveDate>,
    today: NaiveDate,
) -> RejectionOutcome {
    let rejection_count = match last_rejection_date {
        Some(last) if last == today => prev_count + 1,
        _ => 1,
    };

    RejectionOutcome {
        rejection_count,
        suspend: rejection_count >= SUSPENSION_THRESHOLD,
    }
}
