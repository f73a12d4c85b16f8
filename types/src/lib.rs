//! Fundamental types for txwatch.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! transaction hashes, contract identifiers, lifecycle statuses, the tracked
//! transaction item and the wire-level status update.

pub mod contract;
pub mod error;
pub mod hash;
pub mod status;
pub mod transaction;

pub use contract::{DeployedContract, DEFAULT_CONTRACT_STATE};
pub use error::TypesError;
pub use hash::{ContractId, TxHash};
pub use status::TransactionStatus;
pub use transaction::{TransactionItem, TransactionType, TransactionUpdate};
