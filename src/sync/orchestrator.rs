use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::materialize::materialize;
use super::watermark::effective_fetch_start;
use crate::consent::models::authorized_consents;
use crate::consent::ConsentStore;
use crate::error::AppResult;
use crate::provider::BankDataClient;
use crate::transactions::models::{AccountSyncOutcome, SyncSummary};
use crate::transactions::TransactionStore;

/// Per-invocation options supplied by the trigger.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Restrict the run to these account ids. An empty list means no filter.
    pub account_ids: Option<Vec<String>>,
    /// Override the configured lookback for accounts with no watermark.
    pub lookback_days: Option<i64>,
}

/// The sync engine. Composes consent resolution, watermark derivation, the
/// remote client and the store for one user at a time.
///
/// Failures are isolated at consent and account granularity: a failed fetch
/// logs and moves on to the sibling. Only infrastructure failures (the store
/// being unreachable) escape to the caller.
pub struct SyncOrchestrator {
    consents: Arc<dyn ConsentStore>,
    transactions: Arc<dyn TransactionStore>,
    client: Arc<dyn BankDataClient>,
    default_lookback_days: i64,
}

impl SyncOrchestrator {
    pub fn new(
        consents: Arc<dyn ConsentStore>,
        transactions: Arc<dyn TransactionStore>,
        client: Arc<dyn BankDataClient>,
        default_lookback_days: i64,
    ) -> Self {
        Self {
            consents,
            transactions,
            client,
            default_lookback_days,
        }
    }

    pub async fn sync_transactions_for_user(
        &self,
        user_id: &str,
        options: &SyncOptions,
    ) -> AppResult<SyncSummary> {
        let lookback_days = options.lookback_days.unwrap_or(self.default_lookback_days);
        let target_accounts: Option<HashSet<&str>> = options
            .account_ids
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .map(|ids| ids.iter().map(String::as_str).collect());

        let consents = authorized_consents(self.consents.consents_for_user(user_id).await?);

        if consents.is_empty() {
            warn!("No authorized consents found for user {}", user_id);
            return Ok(SyncSummary::empty(user_id));
        }

        let mut summary = SyncSummary::empty(user_id);

        for consent in &consents {
            let consent_id = consent.effective_id();
            // Usable consents always carry a token.
            let Some(token) = consent.consent_token.as_deref() else {
                continue;
            };

            let accounts = match self.client.fetch_accounts(token).await {
                Ok(accounts) => accounts,
                Err(err) => {
                    error!("Failed to fetch accounts for consent {}: {}", consent_id, err);
                    continue;
                }
            };

            for account in &accounts {
                let Some(account_id) = account.effective_id() else {
                    continue;
                };
                if let Some(targets) = &target_accounts {
                    if !targets.contains(account_id) {
                        continue;
                    }
                }

                let watermark = self
                    .transactions
                    .latest_known_date(user_id, account_id)
                    .await?;
                let from = effective_fetch_start(watermark, lookback_days, Utc::now());

                let raw_transactions = match self
                    .client
                    .fetch_transactions(account_id, token, Some(from))
                    .await
                {
                    Ok(transactions) => transactions,
                    Err(err) => {
                        error!(
                            "Failed to fetch transactions for account {}: {}",
                            account_id, err
                        );
                        continue;
                    }
                };

                let mut upserted = 0usize;
                for raw in &raw_transactions {
                    let Some(record) = materialize(raw, user_id, account_id, consent) else {
                        continue;
                    };
                    self.transactions.upsert(&record).await?;
                    upserted += 1;
                }

                info!(
                    "user={} account={} fetched={} upserted={} from={}",
                    user_id,
                    account_id,
                    raw_transactions.len(),
                    upserted,
                    from.to_rfc3339()
                );

                summary.accounts.push(AccountSyncOutcome {
                    account_id: account_id.to_string(),
                    consent_id: consent_id.to_string(),
                    institution_id: consent.institution_id.clone(),
                    fetched: raw_transactions.len(),
                    upserted,
                    from,
                });
            }
        }

        Ok(summary)
    }
}
