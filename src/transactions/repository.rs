use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use super::models::TransactionRecord;
use super::TransactionStore;
use crate::error::AppResult;
use crate::sync::dates::pick_date;

/// Postgres-backed transaction store. Partitioned by user id, keyed by the
/// deterministic composite identity.
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn latest_known_date(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> AppResult<Option<DateTime<Utc>>> {
        let row = sqlx::query(
            r#"
            SELECT booking_datetime, payload
            FROM transactions
            WHERE user_id = $1 AND account_id = $2
            ORDER BY synced_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: serde_json::Value = row.try_get("payload")?;
        let booking: Option<DateTime<Utc>> = row.try_get("booking_datetime")?;
        Ok(pick_date(&payload).or(booking))
    }

    async fn upsert(&self, record: &TransactionRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, user_id, account_id, consent_id, institution_id,
                 booking_datetime, synced_at, source, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                account_id = EXCLUDED.account_id,
                consent_id = EXCLUDED.consent_id,
                institution_id = EXCLUDED.institution_id,
                booking_datetime = EXCLUDED.booking_datetime,
                synced_at = EXCLUDED.synced_at,
                source = EXCLUDED.source,
                payload = EXCLUDED.payload
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.account_id)
        .bind(&record.consent_id)
        .bind(&record.institution_id)
        .bind(record.booking_datetime)
        .bind(record.synced_at)
        .bind(&record.source)
        .bind(&record.payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
