//! How a refresh of pending transactions aggregates its RPC lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use txwatch_rpc::RpcError;
use txwatch_types::TxHash;

/// Aggregation policy for [`refresh_pending_transactions`].
///
/// [`refresh_pending_transactions`]: crate::TransactionStore::refresh_pending_transactions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Apply results only if every lookup succeeds; the first failure is
    /// returned and nothing is updated.
    #[default]
    AllOrNothing,
    /// Apply every successful lookup and report failures individually.
    BestEffort,
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_or_nothing" | "all-or-nothing" => Ok(Self::AllOrNothing),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(format!("unknown refresh policy `{other}`")),
        }
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllOrNothing => f.write_str("all_or_nothing"),
            Self::BestEffort => f.write_str("best_effort"),
        }
    }
}

/// Outcome of one refresh pass.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Pending transactions looked up.
    pub requested: usize,
    /// Lookups whose result matched a tracked transaction and was applied.
    pub applied: usize,
    /// Lookups that failed (only populated under [`RefreshPolicy::BestEffort`]).
    pub failed: Vec<(TxHash, RpcError)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_or_nothing() {
        assert_eq!(RefreshPolicy::default(), RefreshPolicy::AllOrNothing);
    }

    #[test]
    fn parses_both_spellings() {
        assert_eq!(
            "best-effort".parse::<RefreshPolicy>().unwrap(),
            RefreshPolicy::BestEffort
        );
        assert_eq!(
            "all_or_nothing".parse::<RefreshPolicy>().unwrap(),
            RefreshPolicy::AllOrNothing
        );
        assert!("sometimes".parse::<RefreshPolicy>().is_err());
    }
}
