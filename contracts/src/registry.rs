//! Registry of deployed contracts keyed by local contract id.

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

use txwatch_types::{ContractId, DeployedContract};

/// Receiver of deploy-finalization notifications.
pub trait ContractsRegistry: Send + Sync {
    /// Record a contract whose deploy transaction finalized.
    fn add_deployed_contract(&self, contract: DeployedContract);
}

/// In-memory registry. A later deployment for the same id replaces the earlier one.
#[derive(Default)]
pub struct InMemoryContractsRegistry {
    contracts: Mutex<HashMap<ContractId, DeployedContract>>,
    /// Every notification in arrival order, including replaced ones.
    history: Mutex<Vec<DeployedContract>>,
}

impl InMemoryContractsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the deployed contract for `contract_id`.
    pub fn get(&self, contract_id: &ContractId) -> Option<DeployedContract> {
        self.contracts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(contract_id)
            .cloned()
    }

    /// All deployed contracts, in no particular order.
    pub fn list(&self) -> Vec<DeployedContract> {
        self.contracts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// Every notification received so far, oldest first.
    pub fn history(&self) -> Vec<DeployedContract> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ContractsRegistry for InMemoryContractsRegistry {
    fn add_deployed_contract(&self, contract: DeployedContract) {
        info!(
            contract_id = %contract.contract_id,
            address = %contract.address,
            "contract deployed"
        );
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(contract.clone());
        self.contracts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(contract.contract_id.clone(), contract);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txwatch_types::DEFAULT_CONTRACT_STATE;

    #[test]
    fn records_deployed_contract() {
        let registry = InMemoryContractsRegistry::new();
        registry.add_deployed_contract(DeployedContract::new(ContractId::new("c-1"), "0xA"));

        let contract = registry.get(&ContractId::new("c-1")).unwrap();
        assert_eq!(contract.address, "0xA");
        assert_eq!(contract.default_state, DEFAULT_CONTRACT_STATE);
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn redeploy_replaces_but_history_keeps_both() {
        let registry = InMemoryContractsRegistry::new();
        registry.add_deployed_contract(DeployedContract::new(ContractId::new("c-1"), "0xA"));
        registry.add_deployed_contract(DeployedContract::new(ContractId::new("c-1"), "0xB"));

        assert_eq!(registry.get(&ContractId::new("c-1")).unwrap().address, "0xB");
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.history().len(), 2);
    }

    #[test]
    fn unknown_contract_is_none() {
        let registry = InMemoryContractsRegistry::new();
        assert!(registry.get(&ContractId::new("nope")).is_none());
    }
}
