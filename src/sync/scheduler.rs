use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use super::orchestrator::{SyncOptions, SyncOrchestrator};
use crate::consent::ConsentStore;

/// Periodic trigger: every cycle, enumerate all consent-holding users and
/// sync each one. A failing user is logged and does not block the batch.
pub struct SyncScheduler {
    interval_hours: u64,
    orchestrator: Arc<SyncOrchestrator>,
    consents: Arc<dyn ConsentStore>,
}

impl SyncScheduler {
    pub fn new(
        interval_hours: u64,
        orchestrator: Arc<SyncOrchestrator>,
        consents: Arc<dyn ConsentStore>,
    ) -> Self {
        Self {
            interval_hours,
            orchestrator,
            consents,
        }
    }

    /// Start the scheduler (runs in background). The first cycle runs one
    /// full period after startup.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(cycle_period(self.interval_hours));
            // interval's first tick completes immediately; consume it.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                self.run_cycle().await;
            }
        })
    }

    async fn run_cycle(&self) {
        info!("🔄 Starting scheduled sync cycle");

        let user_ids = match self.consents.list_user_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                error!("Failed to enumerate users for scheduled sync: {}", err);
                return;
            }
        };

        for user_id in &user_ids {
            match self
                .orchestrator
                .sync_transactions_for_user(user_id, &SyncOptions::default())
                .await
            {
                Ok(summary) => {
                    info!(
                        "Scheduled sync completed for user {}: {} account(s)",
                        user_id,
                        summary.accounts.len()
                    );
                }
                Err(err) => {
                    error!("Scheduled sync failed for user {}: {}", user_id, err);
                }
            }
        }

        info!("✓ Scheduled sync cycle completed ({} users)", user_ids.len());
    }
}

/// Period between scheduled cycles. A zero-hour configuration still yields
/// a non-zero period so the interval timer cannot spin.
fn cycle_period(interval_hours: u64) -> Duration {
    Duration::from_secs(interval_hours.max(1) * 3600)
}
