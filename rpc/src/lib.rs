//! RPC client for the transaction backend.
//!
//! The store only needs one request/response operation, "get transaction by
//! hash", expressed by the [`RpcClient`] trait so tests can swap in a
//! deterministic implementation. [`JsonRpcClient`] is the real one, speaking
//! JSON-RPC 2.0 over HTTP.

pub mod client;
pub mod error;

pub use client::{JsonRpcClient, RpcClient};
pub use error::RpcError;
