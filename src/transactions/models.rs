use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed source tag written on every record produced by this engine.
pub const SOURCE_TAG: &str = "yapily";

/// A stored transaction. `id` is the deterministic composite identity
/// `{user_id}_{account_id}_{remote_tx_id}`; storing the same remote
/// transaction twice overwrites rather than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub consent_id: String,
    pub institution_id: Option<String>,
    /// Best-effort normalized timestamp taken from the raw payload.
    pub booking_datetime: Option<DateTime<Utc>>,
    pub synced_at: DateTime<Utc>,
    pub source: String,
    /// All fields returned by the remote API, verbatim.
    pub payload: serde_json::Value,
}

/// Per-account outcome of one sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSyncOutcome {
    pub account_id: String,
    pub consent_id: String,
    pub institution_id: Option<String>,
    pub fetched: usize,
    pub upserted: usize,
    /// Effective fetch start used for this account.
    pub from: DateTime<Utc>,
}

/// Ephemeral per-invocation result returned to the trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub user_id: String,
    pub accounts: Vec<AccountSyncOutcome>,
}

impl SyncSummary {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            accounts: Vec::new(),
        }
    }
}
