//! Contracts registry.
//!
//! The transaction store promotes a contract here once its deploy
//! transaction finalizes. The registry trait is the seam; the in-memory
//! implementation is what the watcher and the tests use.

pub mod registry;

pub use registry::{ContractsRegistry, InMemoryContractsRegistry};
