pub mod models;
pub mod repository;

use async_trait::async_trait;

use crate::error::AppResult;
use self::models::Consent;

/// Read-only access to the consent collection. Consents are created and
/// updated by the external authorization flow; this engine only reads them.
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// All consents recorded for a user, in storage order.
    async fn consents_for_user(&self, user_id: &str) -> AppResult<Vec<Consent>>;

    /// Every user id holding a consent document.
    async fn list_user_ids(&self) -> AppResult<Vec<String>>;
}
