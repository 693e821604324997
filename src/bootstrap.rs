use std::{sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{
    api::handler::AppState,
    config::Config,
    consent::{repository::ConsentRepository, ConsentStore},
    error::AppResult,
    provider::{yapily::YapilyClient, BankDataClient},
    sync::{orchestrator::SyncOrchestrator, scheduler::SyncScheduler},
    transactions::{repository::TransactionRepository, TransactionStore},
};

pub async fn initialize_app_state(config: &Config) -> AppResult<AppState> {
    info!("Initializing application components ...");

    let pool = initialize_database(&config.database_url).await?;

    let consents: Arc<dyn ConsentStore> = Arc::new(ConsentRepository::new(pool.clone()));
    let transactions: Arc<dyn TransactionStore> = Arc::new(TransactionRepository::new(pool));
    info!("✅ Consent and transaction repositories initialized");

    let client: Arc<dyn BankDataClient> = Arc::new(YapilyClient::from_config(config)?);
    info!("✅ Yapily client initialized for {}", config.yapily_base_url);

    let orchestrator = Arc::new(SyncOrchestrator::new(
        consents.clone(),
        transactions,
        client,
        config.default_lookback_days,
    ));
    info!(
        "✅ Sync orchestrator initialized (default lookback: {} days)",
        config.default_lookback_days
    );

    // Background scheduled trigger
    SyncScheduler::new(config.sync_interval_hours, orchestrator.clone(), consents.clone()).start();
    info!(
        "✅ Sync scheduler started (every {} hours)",
        config.sync_interval_hours
    );

    Ok(AppState {
        orchestrator,
        consents,
    })
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("📊 Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await?;

    // Run migrations
    info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("✓ Database initialized");
    Ok(pool)
}
