//! Nullable infrastructure for deterministic testing.
//!
//! The transaction store talks to the outside world through the
//! [`RpcClient`](txwatch_rpc::RpcClient) and
//! [`PushChannel`](txwatch_websocket::PushChannel) traits. This crate provides
//! test-friendly implementations that:
//! - Return scripted values
//! - Record every call for later assertions
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod push;
pub mod rpc;

pub use push::NullPushChannel;
pub use rpc::NullRpcClient;
