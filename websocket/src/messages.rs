//! Wire messages exchanged over the push channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use txwatch_types::{TransactionUpdate, TxHash};

use crate::error::ChannelError;

/// Inbound event name carrying a transaction status update.
pub const TRANSACTION_STATUS_UPDATED: &str = "transaction_status_updated";

/// A message sent from client to server.
///
/// Encoded as `{"event": "subscribe", "data": ["0x..", ...]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe(Vec<TxHash>),
    Unsubscribe(Vec<TxHash>),
}

impl ClientMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Subscribe(_) => "subscribe",
            Self::Unsubscribe(_) => "unsubscribe",
        }
    }

    pub fn topics(&self) -> &[TxHash] {
        match self {
            Self::Subscribe(topics) | Self::Unsubscribe(topics) => topics,
        }
    }

    pub fn encode(&self) -> Result<String, ChannelError> {
        serde_json::to_string(self).map_err(|e| ChannelError::Encode(e.to_string()))
    }
}

/// Raw inbound frame before the event name is inspected.
#[derive(Debug, Deserialize)]
struct ServerEnvelope {
    event: String,
    #[serde(default)]
    data: Value,
}

/// An event received from the server that this client understands.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    TransactionStatusUpdated(TransactionUpdate),
}

impl ServerEvent {
    /// Decode a text frame. Events with other names yield `Ok(None)`.
    pub fn decode(text: &str) -> Result<Option<Self>, ChannelError> {
        let envelope: ServerEnvelope =
            serde_json::from_str(text).map_err(|e| ChannelError::Decode(e.to_string()))?;

        if envelope.event != TRANSACTION_STATUS_UPDATED {
            return Ok(None);
        }

        let update = TransactionUpdate::from_payload(envelope.data)
            .map_err(|e| ChannelError::Decode(e.to_string()))?;
        Ok(Some(Self::TransactionStatusUpdated(update)))
    }
}
