//! Nullable RPC client: scripted responses, recorded requests.

use std::collections::HashMap;
use std::sync::Mutex;

use txwatch_rpc::{RpcClient, RpcError};
use txwatch_types::{TransactionUpdate, TxHash};

/// A test RPC client that answers from a script instead of the network.
///
/// Hashes with no scripted answer fail with [`RpcError::NotFound`].
#[derive(Default)]
pub struct NullRpcClient {
    responses: Mutex<HashMap<TxHash, Result<TransactionUpdate, String>>>,
    requests: Mutex<Vec<TxHash>>,
}

impl NullRpcClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups of `update.hash` with `update`.
    pub fn respond_with(&self, update: TransactionUpdate) {
        self.responses
            .lock()
            .unwrap()
            .insert(update.hash.clone(), Ok(update));
    }

    /// Fail lookups of `hash` with a transport error carrying `message`.
    pub fn fail_with(&self, hash: TxHash, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(hash, Err(message.into()));
    }

    /// Every hash requested so far, in call order.
    pub fn requests(&self) -> Vec<TxHash> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear script and recorded requests.
    pub fn reset(&self) {
        self.responses.lock().unwrap().clear();
        self.requests.lock().unwrap().clear();
    }
}

impl RpcClient for NullRpcClient {
    async fn get_transaction_by_hash(&self, hash: &TxHash) -> Result<TransactionUpdate, RpcError> {
        self.requests.lock().unwrap().push(hash.clone());
        match self.responses.lock().unwrap().get(hash) {
            Some(Ok(update)) => Ok(update.clone()),
            Some(Err(message)) => Err(RpcError::RequestFailed(message.clone())),
            None => Err(RpcError::NotFound(hash.clone())),
        }
    }
}
