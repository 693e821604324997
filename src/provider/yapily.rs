use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::models::{Account, ListEnvelope};
use super::BankDataClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Yapily REST client. Application-level Basic credentials go in the default
/// headers; the per-consent token is passed on each request in the `consent`
/// header.
pub struct YapilyClient {
    client: Client,
    base_url: String,
}

impl YapilyClient {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            &config.yapily_application_uuid,
            &config.yapily_application_secret,
            config.yapily_base_url.clone(),
            Duration::from_secs(config.yapily_timeout_secs),
        )
    }

    pub fn new(
        application_uuid: &str,
        application_secret: &str,
        base_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        if application_uuid.is_empty() || application_secret.is_empty() {
            return Err(AppError::Config(
                "YAPILY_APPLICATION_UUID and YAPILY_APPLICATION_SECRET are required".to_string(),
            ));
        }

        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", application_uuid, application_secret));

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Basic {}", credentials))
            .map_err(|e| AppError::Config(format!("Invalid credential bytes: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl BankDataClient for YapilyClient {
    async fn fetch_accounts(&self, consent_token: &str) -> AppResult<Vec<Account>> {
        let url = format!("{}/accounts", self.base_url);
        debug!("Fetching accounts from {}", url);

        let response = self
            .client
            .get(&url)
            .header("consent", consent_token)
            .send()
            .await?
            .error_for_status()?;

        let envelope: ListEnvelope<Account> = response.json().await?;
        Ok(envelope.into_items())
    }

    async fn fetch_transactions(
        &self,
        account_id: &str,
        consent_token: &str,
        from: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<serde_json::Value>> {
        let url = format!("{}/accounts/{}/transactions", self.base_url, account_id);
        debug!("Fetching transactions from {}", url);

        let mut request = self.client.get(&url).header("consent", consent_token);
        if let Some(from) = from {
            request = request.query(&[("from", from.to_rfc3339_opts(SecondsFormat::Millis, true))]);
        }

        let response = request.send().await?.error_for_status()?;

        let envelope: ListEnvelope<serde_json::Value> = response.json().await?;
        Ok(envelope.into_items())
    }
}
