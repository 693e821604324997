use serde::{Deserialize, Serialize};

/// An account discovered under a consent. Not persisted; only used as the
/// fetch-loop key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "accountId")]
    pub account_id: Option<String>,
    /// Anything else the aggregator returns alongside the identifiers.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl Account {
    /// Account identifier, treating empty strings as absent.
    pub fn effective_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.account_id.as_deref().filter(|id| !id.is_empty()))
    }
}

/// The aggregator wraps list results in a `data` envelope; some endpoints
/// return the bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_data_field() {
        let env: ListEnvelope<serde_json::Value> =
            serde_json::from_value(serde_json::json!({ "data": [{"id": "a"}] })).unwrap();
        assert_eq!(env.into_items().len(), 1);
    }

    #[test]
    fn test_envelope_accepts_bare_list() {
        let env: ListEnvelope<serde_json::Value> =
            serde_json::from_value(serde_json::json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(env.into_items().len(), 2);
    }

    #[test]
    fn test_account_effective_id_prefers_id() {
        let acct: Account = serde_json::from_value(serde_json::json!({
            "id": "primary",
            "accountId": "secondary",
            "currency": "GBP"
        }))
        .unwrap();
        assert_eq!(acct.effective_id(), Some("primary"));

        let acct: Account =
            serde_json::from_value(serde_json::json!({ "accountId": "secondary" })).unwrap();
        assert_eq!(acct.effective_id(), Some("secondary"));

        let acct: Account = serde_json::from_value(serde_json::json!({ "currency": "GBP" })).unwrap();
        assert_eq!(acct.effective_id(), None);
    }

    #[test]
    fn test_account_empty_id_falls_through() {
        let acct: Account = serde_json::from_value(serde_json::json!({
            "id": "",
            "accountId": "secondary"
        }))
        .unwrap();
        assert_eq!(acct.effective_id(), Some("secondary"));

        let acct: Account =
            serde_json::from_value(serde_json::json!({ "id": "", "accountId": "" })).unwrap();
        assert_eq!(acct.effective_id(), None);
    }
}
