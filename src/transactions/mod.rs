pub mod models;
pub mod repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use self::models::TransactionRecord;

/// Durable per-user transaction store. The only mutation is an upsert keyed
/// by the record's deterministic identity, which is safe under arbitrary
/// interleaving of concurrent sync runs.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Latest known transaction timestamp for (user, account), extracted
    /// from the most recently written record. `None` when nothing is stored.
    async fn latest_known_date(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> AppResult<Option<DateTime<Utc>>>;

    /// Insert or overwrite by deterministic identity.
    async fn upsert(&self, record: &TransactionRecord) -> AppResult<()>;
}
