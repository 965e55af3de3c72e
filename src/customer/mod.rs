//! Customer domain: entity, registration and lookups

pub mod model;
pub mod service;

pub use model::{Customer, CustomerState, RegisterCustomerRequest};
pub use service::{CustomerError, CustomerService};
