use axum::{
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::handler::{health_check, sync_transactions, AppState};

pub async fn create_app(state: AppState) -> Router {
    info!("⚙️ Setting up HTTP routes...");

    let app = Router::new()
        // Public health check endpoint
        .route("/health", get(health_check))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // On-demand sync trigger: optional userId, accountIds filter,
                // lookbackDays override via query or body
                .route("/sync", get(sync_transactions).post(sync_transactions)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::very_permissive())
        // Add request tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("✓ HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("🌐 Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
