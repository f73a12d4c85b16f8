//! The watch loop.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use txwatch_contracts::ContractsRegistry;
use txwatch_rpc::{JsonRpcClient, RpcClient};
use txwatch_store::TransactionStore;
use txwatch_types::TransactionUpdate;
use txwatch_websocket::WebSocketClient;

use crate::config::WatcherConfig;
use crate::error::WatcherError;

/// Drives a [`TransactionStore`] from push updates and periodic refreshes.
pub struct Watcher<R> {
    store: TransactionStore<R>,
    updates: mpsc::Receiver<TransactionUpdate>,
    refresh_interval: Option<Duration>,
    exit_when_finalized: bool,
}

/// Build a store backed by the real RPC client and push channel.
///
/// The returned watcher owns the store; seed it through
/// [`Watcher::store_mut`] before calling [`Watcher::run`].
pub async fn connect(
    config: &WatcherConfig,
    contracts: Arc<dyn ContractsRegistry>,
) -> Result<Watcher<JsonRpcClient>, WatcherError> {
    config.validate()?;

    let rpc = JsonRpcClient::with_timeouts(
        config.rpc_url.clone(),
        config.request_timeout(),
        config.connect_timeout(),
    )?;
    let (channel, updates) = WebSocketClient::connect(&config.ws_url, config.update_buffer).await?;

    let store = TransactionStore::new(rpc, Arc::new(channel), contracts)
        .with_refresh_policy(config.refresh_policy);

    Ok(Watcher::new(store, updates)
        .with_refresh_interval(config.refresh_interval())
        .exit_when_finalized(config.exit_when_finalized))
}

impl<R: RpcClient> Watcher<R> {
    pub fn new(store: TransactionStore<R>, updates: mpsc::Receiver<TransactionUpdate>) -> Self {
        Self {
            store,
            updates,
            refresh_interval: None,
            exit_when_finalized: true,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn exit_when_finalized(mut self, enabled: bool) -> Self {
        self.exit_when_finalized = enabled;
        self
    }

    pub fn store(&self) -> &TransactionStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TransactionStore<R> {
        &mut self.store
    }

    /// Run until shutdown, until every tracked transaction is finalized
    /// (when enabled), or until no source of updates is left.
    ///
    /// Refresh failures are logged and retried on the next tick. Returns the
    /// store so the caller can inspect the final state.
    pub async fn run(
        self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<TransactionStore<R>, WatcherError> {
        let Self {
            mut store,
            mut updates,
            refresh_interval,
            exit_when_finalized,
        } = self;

        store.init_subscriptions();
        info!(
            tracked = store.len(),
            pending = store.pending_hashes().len(),
            "watching transactions"
        );

        let mut interval = refresh_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let mut channel_open = true;

        loop {
            if exit_when_finalized && store.pending_hashes().is_empty() {
                info!("all tracked transactions finalized");
                break;
            }
            if !channel_open && interval.is_none() {
                warn!("push channel closed and refresh disabled, nothing left to watch");
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("watcher shutting down");
                    break;
                }
                update = updates.recv(), if channel_open => {
                    match update {
                        Some(update) => {
                            store.update_transaction(update);
                        }
                        None => {
                            warn!("push channel closed, continuing with refresh only");
                            channel_open = false;
                        }
                    }
                }
                _ = next_tick(&mut interval) => {
                    match store.refresh_pending_transactions().await {
                        Ok(report) if report.is_complete() => {
                            debug!(
                                requested = report.requested,
                                applied = report.applied,
                                "refresh complete"
                            );
                        }
                        Ok(report) => {
                            warn!(
                                requested = report.requested,
                                applied = report.applied,
                                failed = report.failed.len(),
                                "refresh partially failed"
                            );
                        }
                        Err(e) => warn!("refresh failed: {}", e),
                    }
                }
            }
        }

        Ok(store)
    }
}

/// Resolve on the next refresh tick; never resolves when refresh is disabled.
async fn next_tick(interval: &mut Option<Interval>) -> Instant {
    match interval {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use txwatch_contracts::InMemoryContractsRegistry;
    use txwatch_nullables::{NullPushChannel, NullRpcClient};
    use txwatch_types::{ContractId, TransactionItem, TransactionStatus, TransactionType, TxHash};
    use txwatch_websocket::ClientMessage;

    fn update(hash: &str, status: &str) -> TransactionUpdate {
        TransactionUpdate::from_payload(json!({ "hash": hash, "status": status })).unwrap()
    }

    fn seeded_store(
        rpc: NullRpcClient,
        channel: Arc<NullPushChannel>,
    ) -> TransactionStore<NullRpcClient> {
        let mut store =
            TransactionStore::new(rpc, channel, Arc::new(InMemoryContractsRegistry::new()));
        store.add_transaction(TransactionItem::new(
            TxHash::new("0x1"),
            TransactionType::Method,
            ContractId::new("c"),
        ));
        store
    }

    #[tokio::test]
    async fn exits_once_push_updates_finalize_everything() {
        let channel = Arc::new(NullPushChannel::connected());
        let store = seeded_store(NullRpcClient::new(), channel.clone());
        let (tx, rx) = mpsc::channel(8);
        let shutdown = crate::ShutdownController::new();

        tx.send(update("0x9", "FINALIZED")).await.unwrap();
        tx.send(update("0x1", "ACCEPTED")).await.unwrap();
        tx.send(update("0x1", "FINALIZED")).await.unwrap();

        let store = Watcher::new(store, rx)
            .run(shutdown.subscribe())
            .await
            .unwrap();

        assert_eq!(
            store.get(&TxHash::new("0x1")).unwrap().status,
            TransactionStatus::Finalized
        );
        // Subscriptions were re-sent when the loop started.
        assert!(channel
            .emitted()
            .contains(&ClientMessage::Subscribe(vec![TxHash::new("0x1")])));
    }

    #[tokio::test]
    async fn refresh_finalizes_without_push_updates() {
        let rpc = NullRpcClient::new();
        rpc.respond_with(update("0x1", "FINALIZED"));
        let store = seeded_store(rpc, Arc::new(NullPushChannel::connected()));
        let (_tx, rx) = mpsc::channel(8);
        let shutdown = crate::ShutdownController::new();

        let store = Watcher::new(store, rx)
            .with_refresh_interval(Some(Duration::from_millis(10)))
            .run(shutdown.subscribe())
            .await
            .unwrap();

        assert!(store.pending_hashes().is_empty());
    }

    #[tokio::test]
    async fn refresh_errors_do_not_stop_the_loop() {
        let rpc = NullRpcClient::new();
        rpc.fail_with(TxHash::new("0x1"), "flaky");
        let store = seeded_store(rpc, Arc::new(NullPushChannel::connected()));
        let (tx, rx) = mpsc::channel(8);
        let shutdown = crate::ShutdownController::new();

        let handle = tokio::spawn(
            Watcher::new(store, rx)
                .with_refresh_interval(Some(Duration::from_millis(5)))
                .run(shutdown.subscribe()),
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(update("0x1", "FINALIZED")).await.unwrap();

        let store = handle.await.unwrap().unwrap();
        assert!(store.pending_hashes().is_empty());
    }

    #[tokio::test]
    async fn shutdown_stops_a_pending_watch() {
        let store = seeded_store(NullRpcClient::new(), Arc::new(NullPushChannel::connected()));
        let (_tx, rx) = mpsc::channel(8);
        let shutdown = crate::ShutdownController::new();
        let receiver = shutdown.subscribe();

        shutdown.shutdown();
        let store = Watcher::new(store, rx).run(receiver).await.unwrap();

        assert_eq!(store.pending_hashes(), vec![TxHash::new("0x1")]);
    }

    #[tokio::test]
    async fn closed_channel_without_refresh_ends_the_watch() {
        let store = seeded_store(NullRpcClient::new(), Arc::new(NullPushChannel::connected()));
        let (tx, rx) = mpsc::channel(8);
        drop(tx);
        let shutdown = crate::ShutdownController::new();

        let store = Watcher::new(store, rx)
            .run(shutdown.subscribe())
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
    }
}
