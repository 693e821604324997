use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

use super::models::*;
use crate::{
    consent::ConsentStore,
    error::{AppError, AppResult},
    sync::orchestrator::{SyncOptions, SyncOrchestrator},
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SyncOrchestrator>,
    pub consents: Arc<dyn ConsentStore>,
}

/// Health check
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "banksync",
    })
}

/// On-demand transaction sync
/// GET|POST /api/v1/sync
///
/// Accepts `userId`, `accountIds` (csv or array) and `lookbackDays` from the
/// query string or the JSON body; query values win. Without `userId` every
/// known user is processed. Per-user failures are captured in the response
/// rather than failing the batch.
pub async fn sync_transactions(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
    body: Option<Json<SyncBody>>,
) -> AppResult<Json<SyncResponse>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let user_id = query.user_id.or(body.user_id);
    let account_ids = match (query.account_ids, body.account_ids) {
        (Some(csv), _) => Some(parse_account_ids_csv(&csv)),
        (None, Some(param)) => Some(param.into_ids()),
        (None, None) => None,
    };
    let lookback_days = resolve_lookback(query.lookback_days, body.lookback_days)?;

    let user_ids = match user_id {
        Some(user_id) => vec![user_id],
        None => state.consents.list_user_ids().await?,
    };

    if user_ids.is_empty() {
        return Err(AppError::NoUsersFound);
    }

    info!("On-demand sync requested for {} user(s)", user_ids.len());

    let options = SyncOptions {
        account_ids,
        lookback_days,
    };

    let mut results = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        match state
            .orchestrator
            .sync_transactions_for_user(&user_id, &options)
            .await
        {
            Ok(summary) => results.push(UserSyncResult {
                user_id,
                success: true,
                result: Some(summary),
                error: None,
            }),
            Err(err) => {
                error!("Sync failed for user {}: {}", user_id, err);
                results.push(UserSyncResult {
                    user_id,
                    success: false,
                    result: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    Ok(Json(SyncResponse {
        success: true,
        processed: results.len(),
        results,
    }))
}

fn resolve_lookback(
    from_query: Option<String>,
    from_body: Option<LookbackParam>,
) -> AppResult<Option<i64>> {
    let raw = match (from_query, from_body) {
        (Some(text), _) => Some(LookbackParam::Text(text)),
        (None, body) => body,
    };

    let days = match raw {
        None => return Ok(None),
        Some(LookbackParam::Number(n)) => n,
        Some(LookbackParam::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest(format!("Invalid lookbackDays: {}", text)))?,
    };

    if days <= 0 {
        return Err(AppError::BadRequest(format!(
            "lookbackDays must be positive, got {}",
            days
        )));
    }

    Ok(Some(days))
}
