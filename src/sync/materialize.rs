use chrono::Utc;

use super::dates::pick_date;
use crate::consent::models::Consent;
use crate::transactions::models::{TransactionRecord, SOURCE_TAG};

/// Remote transaction identifier fields, in priority order.
const ID_FIELDS: [&str; 3] = ["id", "transactionId", "internalTransactionId"];

/// Extract the remote transaction identifier, if any.
pub fn remote_transaction_id(raw: &serde_json::Value) -> Option<&str> {
    ID_FIELDS
        .iter()
        .filter_map(|field| raw.get(*field))
        .filter_map(|value| value.as_str())
        .find(|id| !id.is_empty())
}

/// Turn a raw fetched transaction into a storable record. Returns `None`
/// when no remote identifier can be extracted; such transactions are
/// skipped, not treated as errors.
///
/// The identity `{user}_{account}_{remote_id}` is deterministic, so
/// re-fetching an already-stored transaction (the safety backoff guarantees
/// this happens) overwrites instead of duplicating.
pub fn materialize(
    raw: &serde_json::Value,
    user_id: &str,
    account_id: &str,
    consent: &Consent,
) -> Option<TransactionRecord> {
    let remote_id = remote_transaction_id(raw)?;

    Some(TransactionRecord {
        id: format!("{}_{}_{}", user_id, account_id, remote_id),
        user_id: user_id.to_string(),
        account_id: account_id.to_string(),
        consent_id: consent.effective_id().to_string(),
        institution_id: consent.institution_id.clone(),
        booking_datetime: pick_date(raw),
        synced_at: Utc::now(),
        source: SOURCE_TAG.to_string(),
        payload: raw.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::models::ConsentStatus;
    use serde_json::json;

    fn consent() -> Consent {
        Consent {
            id: Some("consent-1".to_string()),
            consent_id: None,
            status: ConsentStatus::Authorized,
            consent_token: Some("tok".to_string()),
            institution_id: Some("monzo".to_string()),
        }
    }

    #[test]
    fn test_id_field_wins_over_transaction_id() {
        let raw = json!({ "id": "tx-a", "transactionId": "tx-b" });
        assert_eq!(remote_transaction_id(&raw), Some("tx-a"));
    }

    #[test]
    fn test_id_priority_chain() {
        let raw = json!({ "transactionId": "tx-b", "internalTransactionId": "tx-c" });
        assert_eq!(remote_transaction_id(&raw), Some("tx-b"));

        let raw = json!({ "internalTransactionId": "tx-c" });
        assert_eq!(remote_transaction_id(&raw), Some("tx-c"));
    }

    #[test]
    fn test_missing_identifier_yields_none() {
        let raw = json!({ "amount": 9.99, "description": "coffee" });
        assert!(materialize(&raw, "user-1", "acct-1", &consent()).is_none());
    }

    #[test]
    fn test_deterministic_identity_and_attribution() {
        let raw = json!({
            "id": "tx-42",
            "bookingDateTime": "2024-06-01T09:00:00Z",
            "amount": -3.20
        });

        let record = materialize(&raw, "user-1", "acct-1", &consent()).unwrap();
        assert_eq!(record.id, "user-1_acct-1_tx-42");
        assert_eq!(record.consent_id, "consent-1");
        assert_eq!(record.institution_id.as_deref(), Some("monzo"));
        assert_eq!(record.source, SOURCE_TAG);
        assert!(record.booking_datetime.is_some());
        assert_eq!(record.payload, raw);

        // Same raw transaction, same identity.
        let again = materialize(&raw, "user-1", "acct-1", &consent()).unwrap();
        assert_eq!(again.id, record.id);
    }
}
