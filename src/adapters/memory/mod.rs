//! In-memory persistence adapter.
//!
//! A single store implementing every persistence and reference-data port over
//! plain maps. Useful for:
//! - Development without a database
//! - Integration tests exercising full handler flows
//! - Demonstration and prototyping
//!
//! For production deployments use the PostgreSQL adapters instead.

mod store;

pub use store::InMemoryStore;
