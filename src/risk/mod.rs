//! Risk and suspension policy
//!
//! Counts same-day rejections per customer and suspends the account on the
//! second rejection within one calendar day. Suspension is monotonic here:
//! reactivation is an administrative action outside this service.

pub mod policy;
pub mod service;

pub use policy::{RejectionOutcome, SUSPENSION_THRESHOLD};
pub use service::{RiskError, RiskService};
