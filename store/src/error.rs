use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("RPC error: {0}")]
    Rpc(#[from] txwatch_rpc::RpcError),

    #[error("invalid transaction update: {0}")]
    InvalidUpdate(#[from] txwatch_types::TypesError),
}
