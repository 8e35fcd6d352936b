//! Infrastructure layer module
//!
//! - Configuration loading (figment)
//! - Logging initialisation (tracing-subscriber)

pub mod config;
pub mod logging;
