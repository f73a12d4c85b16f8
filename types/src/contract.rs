//! Deployed contract record handed to the contracts registry.

use serde::{Deserialize, Serialize};

use crate::hash::ContractId;

/// Initial state attached to a freshly promoted contract.
pub const DEFAULT_CONTRACT_STATE: &str = "{}";

/// A contract whose deploy transaction reached finality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedContract {
    pub contract_id: ContractId,
    pub address: String,
    pub default_state: String,
}

impl DeployedContract {
    /// Create a record with the empty default state.
    pub fn new(contract_id: ContractId, address: impl Into<String>) -> Self {
        Self {
            contract_id,
            address: address.into(),
            default_state: DEFAULT_CONTRACT_STATE.to_string(),
        }
    }
}
