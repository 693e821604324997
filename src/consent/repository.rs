use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::models::{self, Consent};
use super::ConsentStore;
use crate::error::{AppError, AppResult};

/// Postgres-backed consent collection. One row per user, the consent
/// sub-records held as a JSONB array written by the authorization flow.
pub struct ConsentRepository {
    pool: PgPool,
}

impl ConsentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsentStore for ConsentRepository {
    async fn consents_for_user(&self, user_id: &str) -> AppResult<Vec<Consent>> {
        let row = sqlx::query(
            r#"
            SELECT consents FROM consents WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let raw: serde_json::Value = row.try_get("consents")?;
        Ok(models::parse_consent_document(raw))
    }

    async fn list_user_ids(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id FROM consents ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_get::<String, _>("user_id").map_err(AppError::from))
            .collect()
    }
}
