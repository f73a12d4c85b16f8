//! Client-side transaction store.
//!
//! [`TransactionStore`] holds every transaction the UI knows about, keeps the
//! push channel subscribed to their hashes, applies status updates from the
//! channel or from RPC refreshes, and promotes deployed contracts when a
//! deploy transaction finalizes.
//!
//! The store is an explicit per-session value; collaborators are injected:
//! - an [`RpcClient`](txwatch_rpc::RpcClient) for by-hash lookups,
//! - a [`PushChannel`](txwatch_websocket::PushChannel) for subscriptions,
//! - a [`ContractsRegistry`](txwatch_contracts::ContractsRegistry) for deploys.

pub mod error;
pub mod refresh;
pub mod store;
pub mod subscriptions;

pub use error::StoreError;
pub use refresh::{RefreshPolicy, RefreshReport};
pub use store::TransactionStore;
pub use subscriptions::SubscriptionSet;
