//! The push channel as seen by the transaction store.

use crate::messages::ClientMessage;

/// Outbound side of a real-time channel.
///
/// Connection lifecycle belongs to the implementation: callers only read
/// [`is_connected`](PushChannel::is_connected) and never change it.
pub trait PushChannel: Send + Sync {
    /// Whether the channel currently has a live connection.
    fn is_connected(&self) -> bool;

    /// Queue a message for delivery. Fire-and-forget; failures are logged
    /// by the implementation.
    fn emit(&self, message: ClientMessage);
}
