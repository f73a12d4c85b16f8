use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect push channel: {0}")]
    Connect(String),

    #[error("push channel closed")]
    Closed,

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("failed to decode event: {0}")]
    Decode(String),
}
