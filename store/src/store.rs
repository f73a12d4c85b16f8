//! The transaction store.

use futures_util::future::{join_all, try_join_all};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use txwatch_contracts::ContractsRegistry;
use txwatch_rpc::{RpcClient, RpcError};
use txwatch_types::{
    ContractId, DeployedContract, TransactionItem, TransactionStatus, TransactionUpdate, TxHash,
};
use txwatch_websocket::PushChannel;

use crate::error::StoreError;
use crate::refresh::{RefreshPolicy, RefreshReport};
use crate::subscriptions::SubscriptionSet;

/// A tracked transaction together with its display sequence number.
struct Entry {
    seq: u64,
    item: TransactionItem,
}

/// In-memory store of the transactions known to the UI.
///
/// Lookups go through a hash-keyed map; display order (newest first) is a
/// separate index keyed by insertion sequence, so no operation scans the
/// list to find a transaction. Hashes are unique: adding a hash that is
/// already tracked replaces the old entry and moves it to the front.
pub struct TransactionStore<R> {
    rpc: R,
    contracts: Arc<dyn ContractsRegistry>,
    subscriptions: SubscriptionSet,
    entries: HashMap<TxHash, Entry>,
    /// Insertion sequence -> hash. Iterated in reverse for newest-first.
    order: BTreeMap<u64, TxHash>,
    next_seq: u64,
    refresh_policy: RefreshPolicy,
}

impl<R: RpcClient> TransactionStore<R> {
    pub fn new(
        rpc: R,
        channel: Arc<dyn PushChannel>,
        contracts: Arc<dyn ContractsRegistry>,
    ) -> Self {
        Self {
            rpc,
            contracts,
            subscriptions: SubscriptionSet::new(channel),
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            refresh_policy: RefreshPolicy::default(),
        }
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Track `tx` at the front of the list and subscribe to its hash.
    pub fn add_transaction(&mut self, tx: TransactionItem) {
        let hash = tx.hash.clone();
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(previous) = self.entries.insert(hash.clone(), Entry { seq, item: tx }) {
            debug!(%hash, "transaction re-added, replacing previous entry");
            self.order.remove(&previous.seq);
        }
        self.order.insert(seq, hash.clone());
        debug!(%hash, "transaction added");

        self.subscriptions.subscribe(vec![hash]);
    }

    /// Stop tracking `hash` and unsubscribe from it. No-op if unknown.
    pub fn remove_transaction(&mut self, hash: &TxHash) -> Option<TransactionItem> {
        let removed = self.entries.remove(hash).map(|entry| {
            self.order.remove(&entry.seq);
            entry.item
        });
        self.subscriptions.unsubscribe(hash);
        if removed.is_some() {
            debug!(%hash, "transaction removed");
        }
        removed
    }

    /// Apply a status update to the tracked transaction with the same hash.
    ///
    /// The entry keeps its position and every field except `status` and
    /// `data`, which become the incoming status and the entire incoming
    /// payload. A deploy going `ACCEPTED → FINALIZED` promotes its contract
    /// in the registry; no other transition does.
    ///
    /// Updates for unknown hashes are dropped. Returns whether the update
    /// was applied.
    pub fn update_transaction(&mut self, update: TransactionUpdate) -> bool {
        let Some(entry) = self.entries.get_mut(&update.hash) else {
            warn!(
                hash = %update.hash,
                status = %update.status,
                "transaction not found, dropping update"
            );
            return false;
        };

        let item = &mut entry.item;
        let promotes_contract = item.status == TransactionStatus::Accepted
            && item.is_deploy()
            && update.status == TransactionStatus::Finalized;

        let deployed = if promotes_contract {
            match update.contract_address() {
                Some(address) => Some(DeployedContract::new(
                    item.local_contract_id.clone(),
                    address,
                )),
                None => {
                    warn!(
                        hash = %update.hash,
                        contract_id = %item.local_contract_id,
                        "finalized deploy carries no contract address"
                    );
                    None
                }
            }
        } else {
            None
        };

        debug!(
            hash = %update.hash,
            from = %item.status,
            to = %update.status,
            "transaction status updated"
        );
        item.status = update.status;
        item.data = Some(update.payload);

        if let Some(contract) = deployed {
            info!(
                contract_id = %contract.contract_id,
                address = %contract.address,
                "deploy finalized, promoting contract"
            );
            self.contracts.add_deployed_contract(contract);
        }

        true
    }

    /// Validate a raw wire record, then apply it as [`update_transaction`] does.
    ///
    /// [`update_transaction`]: Self::update_transaction
    pub fn update_transaction_from_payload(&mut self, payload: Value) -> Result<bool, StoreError> {
        let update = TransactionUpdate::from_payload(payload)?;
        Ok(self.update_transaction(update))
    }

    /// Stop tracking every transaction belonging to `contract_id`.
    ///
    /// Returns how many were removed.
    pub fn clear_transactions_for_contract(&mut self, contract_id: &ContractId) -> usize {
        let matching: Vec<(u64, TxHash)> = self
            .order
            .iter()
            .rev()
            .filter(|(_, hash)| {
                self.entries
                    .get(*hash)
                    .is_some_and(|entry| &entry.item.local_contract_id == contract_id)
            })
            .map(|(seq, hash)| (*seq, hash.clone()))
            .collect();

        for (_, hash) in &matching {
            self.subscriptions.unsubscribe(hash);
        }
        for (seq, hash) in &matching {
            self.order.remove(seq);
            self.entries.remove(hash);
        }

        if !matching.is_empty() {
            debug!(
                %contract_id,
                removed = matching.len(),
                "cleared transactions for contract"
            );
        }
        matching.len()
    }

    /// Subscribe the push channel to every tracked hash.
    ///
    /// Call once the channel is (re)established.
    pub fn init_subscriptions(&mut self) {
        let hashes: Vec<TxHash> = self.order.values().rev().cloned().collect();
        self.subscriptions.subscribe(hashes);
    }

    // ── RPC ─────────────────────────────────────────────────────────────

    /// Look up `hash` through the RPC client. Errors pass through unchanged.
    pub async fn get_transaction(&self, hash: &TxHash) -> Result<TransactionUpdate, RpcError> {
        self.rpc.get_transaction_by_hash(hash).await
    }

    /// Re-fetch every non-finalized transaction and apply the results.
    ///
    /// All lookups are issued concurrently and awaited together. How
    /// failures are handled depends on the configured [`RefreshPolicy`].
    pub async fn refresh_pending_transactions(&mut self) -> Result<RefreshReport, StoreError> {
        let pending = self.pending_hashes();
        let mut report = RefreshReport {
            requested: pending.len(),
            ..RefreshReport::default()
        };
        if pending.is_empty() {
            return Ok(report);
        }
        debug!(
            count = pending.len(),
            policy = %self.refresh_policy,
            "refreshing pending transactions"
        );

        let rpc = &self.rpc;
        let lookups: Vec<_> = pending
            .iter()
            .map(|hash| rpc.get_transaction_by_hash(hash))
            .collect();

        match self.refresh_policy {
            RefreshPolicy::AllOrNothing => {
                let updates = try_join_all(lookups).await?;
                for update in updates {
                    if self.update_transaction(update) {
                        report.applied += 1;
                    }
                }
            }
            RefreshPolicy::BestEffort => {
                let results = join_all(lookups).await;
                for (hash, result) in pending.into_iter().zip(results) {
                    match result {
                        Ok(update) => {
                            if self.update_transaction(update) {
                                report.applied += 1;
                            }
                        }
                        Err(e) => {
                            warn!(%hash, "refresh lookup failed: {}", e);
                            report.failed.push((hash, e));
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Tracked transactions, newest first.
    pub fn transactions(&self) -> impl Iterator<Item = &TransactionItem> + '_ {
        self.order
            .values()
            .rev()
            .filter_map(move |hash| self.entries.get(hash).map(|entry| &entry.item))
    }

    pub fn get(&self, hash: &TxHash) -> Option<&TransactionItem> {
        self.entries.get(hash).map(|entry| &entry.item)
    }

    /// Hashes of every transaction not yet `FINALIZED`, newest first.
    pub fn pending_hashes(&self) -> Vec<TxHash> {
        self.transactions()
            .filter(|tx| !tx.status.is_finalized())
            .map(|tx| tx.hash.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    pub fn is_subscribed(&self, hash: &TxHash) -> bool {
        self.subscriptions.contains(hash)
    }
}
