//! CLI command implementations.

pub mod init;
pub mod pr;
pub mod serve;
pub mod team;
pub mod user;
