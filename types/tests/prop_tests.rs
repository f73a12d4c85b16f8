use proptest::prelude::*;
use serde_json::json;

use txwatch_types::{TransactionStatus, TransactionUpdate, TxHash};

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Canceled),
        Just(TransactionStatus::Proposing),
        Just(TransactionStatus::Committing),
        Just(TransactionStatus::Revealing),
        Just(TransactionStatus::Accepted),
        Just(TransactionStatus::Undetermined),
        Just(TransactionStatus::Finalized),
        Just(TransactionStatus::LeaderTimeout),
        Just(TransactionStatus::ValidatorsTimeout),
        "[A-Z]{3,12}_X".prop_map(TransactionStatus::Other),
    ]
}

proptest! {
    /// The wire string of any status parses back to the same status.
    #[test]
    fn status_wire_string_is_stable(status in arb_status()) {
        let parsed = TransactionStatus::from(status.as_str().to_string());
        prop_assert_eq!(parsed, status);
    }

    /// Any object with string `hash` and `status` validates, and the payload is kept whole.
    #[test]
    fn well_formed_updates_validate(
        hash in "0x[0-9a-f]{1,64}",
        status in arb_status(),
        extra in any::<u32>(),
    ) {
        let raw = json!({ "hash": hash, "status": status.as_str(), "extra": extra });
        let update = TransactionUpdate::from_payload(raw.clone()).unwrap();
        prop_assert_eq!(update.hash, TxHash::new(hash));
        prop_assert_eq!(update.status, status);
        prop_assert_eq!(update.payload, raw);
    }
}
