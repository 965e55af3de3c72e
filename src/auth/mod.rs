//! Phone/OTP authentication and device sessions
//!
//! The loan engine itself never validates OTPs or sessions; it consumes a
//! resolved customer id. This module is the gateway that does the resolving.

pub mod model;
pub mod service;

pub use model::{CustomerSession, OtpRequest};
pub use service::{AuthError, AuthService};
