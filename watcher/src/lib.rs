//! Watcher service.
//!
//! Connects a [`TransactionStore`](txwatch_store::TransactionStore) to the
//! real collaborators (JSON-RPC over HTTP, push channel over WebSocket) and
//! drives it: inbound push updates are applied as they arrive and pending
//! transactions are refreshed on an interval until they all finalize or a
//! shutdown signal arrives.

pub mod config;
pub mod error;
pub mod shutdown;
pub mod watcher;

pub use config::WatcherConfig;
pub use error::WatcherError;
pub use shutdown::ShutdownController;
pub use watcher::{connect, Watcher};
