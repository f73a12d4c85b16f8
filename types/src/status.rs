//! Transaction lifecycle status.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Status of a transaction as reported by the backend.
///
/// The usual path is `PENDING → ACCEPTED → FINALIZED`, with consensus
/// sub-states in between. Transitions are observed, never enforced, and any
/// status string the backend emits that is not listed here is kept verbatim
/// in [`TransactionStatus::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Pending,
    Canceled,
    Proposing,
    Committing,
    Revealing,
    Accepted,
    Undetermined,
    Finalized,
    LeaderTimeout,
    ValidatorsTimeout,
    Other(String),
}

impl TransactionStatus {
    /// Wire representation (upper snake case).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Canceled => "CANCELED",
            Self::Proposing => "PROPOSING",
            Self::Committing => "COMMITTING",
            Self::Revealing => "REVEALING",
            Self::Accepted => "ACCEPTED",
            Self::Undetermined => "UNDETERMINED",
            Self::Finalized => "FINALIZED",
            Self::LeaderTimeout => "LEADER_TIMEOUT",
            Self::ValidatorsTimeout => "VALIDATORS_TIMEOUT",
            Self::Other(s) => s,
        }
    }

    /// Finalized transactions are never refreshed again.
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl FromStr for TransactionStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PENDING" => Self::Pending,
            "CANCELED" => Self::Canceled,
            "PROPOSING" => Self::Proposing,
            "COMMITTING" => Self::Committing,
            "REVEALING" => Self::Revealing,
            "ACCEPTED" => Self::Accepted,
            "UNDETERMINED" => Self::Undetermined,
            "FINALIZED" => Self::Finalized,
            "LEADER_TIMEOUT" => Self::LeaderTimeout,
            "VALIDATORS_TIMEOUT" => Self::ValidatorsTimeout,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse() {
        assert_eq!(
            TransactionStatus::from("ACCEPTED".to_string()),
            TransactionStatus::Accepted
        );
        assert_eq!(
            TransactionStatus::from("LEADER_TIMEOUT".to_string()),
            TransactionStatus::LeaderTimeout
        );
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status: TransactionStatus = serde_json::from_str("\"APPEALED\"").unwrap();
        assert_eq!(status, TransactionStatus::Other("APPEALED".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"APPEALED\"");
    }

    #[test]
    fn only_finalized_is_final() {
        assert!(TransactionStatus::Finalized.is_finalized());
        assert!(!TransactionStatus::Accepted.is_finalized());
        assert!(!TransactionStatus::Other("FINALIZED_ISH".into()).is_finalized());
    }
}
