//! WebSocket push channel for real-time transaction updates.
//!
//! Clients emit `subscribe` / `unsubscribe` messages carrying transaction
//! hashes, and receive `transaction_status_updated` events for the hashes
//! they are subscribed to.

pub mod channel;
pub mod client;
pub mod error;
pub mod messages;

pub use channel::PushChannel;
pub use client::{WebSocketClient, DEFAULT_UPDATE_BUFFER};
pub use error::ChannelError;
pub use messages::{ClientMessage, ServerEvent};
