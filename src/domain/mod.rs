//! Domain layer for the review roster
//!
//! Entities, their validation rules, the error taxonomy, and the ports that
//! storage adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, EntityKind, ValidationError, ValidationKind};
