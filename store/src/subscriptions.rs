//! Subscription bookkeeping mirrored onto the push channel.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use txwatch_types::TxHash;
use txwatch_websocket::{ClientMessage, PushChannel};

/// Set of transaction hashes the push channel should forward events for.
///
/// The set is always updated; wire messages go out only while the channel
/// reports itself connected. After a reconnect the owner must resend the
/// whole set (see [`TransactionStore::init_subscriptions`]).
///
/// [`TransactionStore::init_subscriptions`]: crate::TransactionStore::init_subscriptions
pub struct SubscriptionSet {
    topics: HashSet<TxHash>,
    channel: Arc<dyn PushChannel>,
}

impl SubscriptionSet {
    pub fn new(channel: Arc<dyn PushChannel>) -> Self {
        Self {
            topics: HashSet::new(),
            channel,
        }
    }

    /// Add every hash in `topics` and, if connected, emit one `subscribe`
    /// carrying all of them (already-present hashes included).
    pub fn subscribe(&mut self, topics: Vec<TxHash>) {
        if topics.is_empty() {
            return;
        }
        self.topics.extend(topics.iter().cloned());

        if self.channel.is_connected() {
            self.channel.emit(ClientMessage::Subscribe(topics));
        } else {
            debug!(
                count = topics.len(),
                "push channel offline, subscription recorded locally"
            );
        }
    }

    /// Remove `topic`. Emits `unsubscribe` only if it was present and the
    /// channel is connected. Returns whether it was present.
    pub fn unsubscribe(&mut self, topic: &TxHash) -> bool {
        let removed = self.topics.remove(topic);
        if removed && self.channel.is_connected() {
            self.channel
                .emit(ClientMessage::Unsubscribe(vec![topic.clone()]));
        }
        removed
    }

    pub fn contains(&self, topic: &TxHash) -> bool {
        self.topics.contains(topic)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TxHash> {
        self.topics.iter()
    }
}
