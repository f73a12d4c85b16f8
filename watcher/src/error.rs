use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] txwatch_rpc::RpcError),

    #[error("push channel error: {0}")]
    Channel(#[from] txwatch_websocket::ChannelError),

    #[error("store error: {0}")]
    Store(#[from] txwatch_store::StoreError),
}
