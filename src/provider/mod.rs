pub mod models;
pub mod yapily;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use self::models::Account;

/// Remote data client for the open-banking aggregator. Every call is a live
/// request; retry and failure-isolation policy belongs to the orchestrator.
#[async_trait]
pub trait BankDataClient: Send + Sync {
    /// Accounts reachable under a consent token.
    async fn fetch_accounts(&self, consent_token: &str) -> AppResult<Vec<Account>>;

    /// Raw transactions for an account, optionally bounded below (inclusive)
    /// by `from`.
    async fn fetch_transactions(
        &self,
        account_id: &str,
        consent_token: &str,
        from: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<serde_json::Value>>;
}
