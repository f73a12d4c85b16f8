//! Tracked transactions and the status updates that mutate them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypesError;
use crate::hash::{ContractId, TxHash};
use crate::status::TransactionStatus;

/// What a transaction does to its contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Deploys a new contract; finalization yields its address.
    Deploy,
    /// Calls a method on an existing contract.
    Method,
}

/// One transaction as known to the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub hash: TxHash,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub local_contract_id: ContractId,
    /// Last full payload received for this transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl TransactionItem {
    /// A freshly submitted transaction, `PENDING` with no payload yet.
    pub fn new(hash: TxHash, tx_type: TransactionType, local_contract_id: ContractId) -> Self {
        Self {
            hash,
            status: TransactionStatus::Pending,
            tx_type,
            local_contract_id,
            data: None,
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_deploy(&self) -> bool {
        self.tx_type == TransactionType::Deploy
    }
}

/// An incoming status update, from the push channel or an RPC lookup.
///
/// Only `hash` and `status` are required; the rest of the record is kept
/// opaque in `payload`, which holds the *entire* incoming object and is what
/// ends up in [`TransactionItem::data`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct TransactionUpdate {
    pub hash: TxHash,
    pub status: TransactionStatus,
    pub payload: Value,
}

impl TransactionUpdate {
    pub fn new(hash: TxHash, status: TransactionStatus, payload: Value) -> Self {
        Self {
            hash,
            status,
            payload,
        }
    }

    /// Validate a raw wire record and extract its key fields.
    pub fn from_payload(payload: Value) -> Result<Self, TypesError> {
        let object = payload.as_object().ok_or(TypesError::NotAnObject)?;

        let hash = required_str(object, "hash")?;
        if hash.is_empty() {
            return Err(TypesError::InvalidField {
                field: "hash",
                reason: "empty".into(),
            });
        }
        let status = required_str(object, "status")?;

        Ok(Self {
            hash: TxHash::new(hash),
            status: TransactionStatus::from(status.to_string()),
            payload,
        })
    }

    /// Deployed address carried by a finalized deploy, at `data.contract_address`.
    pub fn contract_address(&self) -> Option<&str> {
        self.payload
            .get("data")?
            .get("contract_address")?
            .as_str()
    }
}

impl TryFrom<Value> for TransactionUpdate {
    type Error = TypesError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_payload(value)
    }
}

fn required_str<'a>(
    object: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, TypesError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(TypesError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(TypesError::InvalidField {
            field,
            reason: format!("expected string, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_uses_camel_case_wire_names() {
        let item = TransactionItem::new(
            TxHash::new("0x1"),
            TransactionType::Deploy,
            ContractId::new("c-1"),
        );
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "hash": "0x1",
                "status": "PENDING",
                "type": "deploy",
                "localContractId": "c-1",
            })
        );
    }

    #[test]
    fn update_keeps_entire_payload() {
        let raw = json!({
            "hash": "0xabc",
            "status": "FINALIZED",
            "data": { "contract_address": "0xA" },
            "consensus_data": { "votes": 3 },
        });
        let update = TransactionUpdate::from_payload(raw.clone()).unwrap();
        assert_eq!(update.hash, TxHash::new("0xabc"));
        assert_eq!(update.status, TransactionStatus::Finalized);
        assert_eq!(update.payload, raw);
        assert_eq!(update.contract_address(), Some("0xA"));
    }

    #[test]
    fn update_without_contract_address() {
        let update =
            TransactionUpdate::from_payload(json!({ "hash": "0x1", "status": "ACCEPTED" }))
                .unwrap();
        assert_eq!(update.contract_address(), None);
    }

    #[test]
    fn update_rejects_missing_fields() {
        assert_eq!(
            TransactionUpdate::from_payload(json!({ "status": "PENDING" })),
            Err(TypesError::MissingField("hash"))
        );
        assert_eq!(
            TransactionUpdate::from_payload(json!({ "hash": "0x1", "status": null })),
            Err(TypesError::MissingField("status"))
        );
        assert_eq!(
            TransactionUpdate::from_payload(json!(["0x1"])),
            Err(TypesError::NotAnObject)
        );
    }

    #[test]
    fn update_rejects_non_string_hash() {
        let err = TransactionUpdate::from_payload(json!({ "hash": 7, "status": "PENDING" }))
            .unwrap_err();
        assert!(matches!(err, TypesError::InvalidField { field: "hash", .. }));
    }

    #[test]
    fn update_deserializes_through_validation() {
        let update: TransactionUpdate =
            serde_json::from_str(r#"{"hash":"0x9","status":"PROPOSING"}"#).unwrap();
        assert_eq!(update.status, TransactionStatus::Proposing);
        assert!(serde_json::from_str::<TransactionUpdate>(r#"{"hash":"0x9"}"#).is_err());
    }
}
