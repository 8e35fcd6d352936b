//! Adapters: storage backends, randomness, and the HTTP surface.

pub mod http;
pub mod memory;
pub mod random;
pub mod sqlite;
