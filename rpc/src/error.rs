//! RPC client error types.

use thiserror::Error;
use txwatch_types::{TxHash, TypesError};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC request failed: {0}")]
    RequestFailed(String),

    #[error("RPC endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("RPC endpoint returned HTTP {0}")]
    Http(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("transaction {0} not found")]
    NotFound(TxHash),
}

impl From<TypesError> for RpcError {
    fn from(e: TypesError) -> Self {
        RpcError::InvalidResponse(e.to_string())
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            RpcError::Unreachable(format!("connection failed: {e}"))
        } else {
            RpcError::RequestFailed(e.to_string())
        }
    }
}
