//! In-memory storage adapter.
//!
//! Holds users, teams, and pull requests in maps behind a single lock. State
//! is lost on restart; used by tests and for running without a database.

pub mod store;

pub use store::InMemoryStore;
