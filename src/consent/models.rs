use serde::{Deserialize, Serialize};
use tracing::warn;

/// Consent lifecycle states as reported by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    AwaitingAuthorization,
    AwaitingFurtherAuthorization,
    Authorized,
    Consumed,
    Rejected,
    Revoked,
    Expired,
    Failed,
    #[serde(other)]
    Unknown,
}

impl Default for ConsentStatus {
    fn default() -> Self {
        ConsentStatus::Unknown
    }
}

/// A single consent sub-record inside a user's consent document.
/// Field names follow the remote API verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "consentId")]
    pub consent_id: Option<String>,
    #[serde(default)]
    pub status: ConsentStatus,
    #[serde(default, rename = "consentToken")]
    pub consent_token: Option<String>,
    #[serde(default, rename = "institutionId")]
    pub institution_id: Option<String>,
}

impl Consent {
    /// Consent identifier used for logging and record attribution.
    /// Empty strings count as absent.
    pub fn effective_id(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.consent_id.as_deref().filter(|id| !id.is_empty()))
            .unwrap_or("unknown")
    }

    /// Only AUTHORIZED consents carrying a token can be used for fetching.
    pub fn is_usable(&self) -> bool {
        self.status == ConsentStatus::Authorized
            && self.consent_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Filter a user's consents down to the ones usable for fetching,
/// preserving storage order.
pub fn authorized_consents(consents: Vec<Consent>) -> Vec<Consent> {
    consents.into_iter().filter(Consent::is_usable).collect()
}

/// Parse a consent document's JSONB array element by element. Sub-records
/// that fail to parse are dropped with a warning; one junk entry must not
/// block a user's well-formed consents.
pub fn parse_consent_document(raw: serde_json::Value) -> Vec<Consent> {
    let Some(entries) = raw.as_array() else {
        warn!("Consent document is not an array, treating as empty");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(consent) => Some(consent),
            Err(err) => {
                warn!("Dropping malformed consent sub-record: {}", err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consent(status: ConsentStatus, token: Option<&str>) -> Consent {
        Consent {
            id: Some("c-1".to_string()),
            consent_id: None,
            status,
            consent_token: token.map(str::to_string),
            institution_id: None,
        }
    }

    #[test]
    fn test_only_authorized_with_token_is_usable() {
        assert!(consent(ConsentStatus::Authorized, Some("tok")).is_usable());
        assert!(!consent(ConsentStatus::Authorized, None).is_usable());
        assert!(!consent(ConsentStatus::Authorized, Some("")).is_usable());
        assert!(!consent(ConsentStatus::Revoked, Some("tok")).is_usable());
        assert!(!consent(ConsentStatus::Expired, Some("tok")).is_usable());
    }

    #[test]
    fn test_effective_id_fallback_chain() {
        let mut c = consent(ConsentStatus::Authorized, Some("tok"));
        assert_eq!(c.effective_id(), "c-1");

        c.id = None;
        c.consent_id = Some("alt".to_string());
        assert_eq!(c.effective_id(), "alt");

        c.consent_id = None;
        assert_eq!(c.effective_id(), "unknown");

        c.id = Some("".to_string());
        c.consent_id = Some("alt".to_string());
        assert_eq!(c.effective_id(), "alt");
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let c: Consent = serde_json::from_value(serde_json::json!({
            "id": "c-2",
            "status": "SOMETHING_NEW",
            "consentToken": "tok"
        }))
        .unwrap();
        assert_eq!(c.status, ConsentStatus::Unknown);
        assert!(!c.is_usable());
    }

    #[test]
    fn test_missing_status_defaults_to_unknown() {
        let c: Consent = serde_json::from_value(serde_json::json!({
            "id": "c-2",
            "consentToken": "tok"
        }))
        .unwrap();
        assert_eq!(c.status, ConsentStatus::Unknown);
        assert!(!c.is_usable());
    }

    #[test]
    fn test_malformed_sub_record_does_not_block_document() {
        let doc = serde_json::json!([
            { "id": "c-1", "status": "AUTHORIZED", "consentToken": "tok" },
            { "id": "c-2", "consentToken": "tok2" },
            "garbage",
            { "id": "c-3", "status": "AUTHORIZED", "consentToken": "tok3" }
        ]);

        let consents = parse_consent_document(doc);
        assert_eq!(consents.len(), 3);

        let usable = authorized_consents(consents);
        let ids: Vec<_> = usable.iter().map(|c| c.effective_id()).collect();
        assert_eq!(ids, vec!["c-1", "c-3"]);
    }

    #[test]
    fn test_non_array_document_is_empty() {
        assert!(parse_consent_document(serde_json::json!({"status": "AUTHORIZED"})).is_empty());
        assert!(parse_consent_document(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_authorized_consents_preserves_order() {
        let list = vec![
            Consent { id: Some("a".into()), ..consent(ConsentStatus::Authorized, Some("t1")) },
            Consent { id: Some("b".into()), ..consent(ConsentStatus::Rejected, Some("t2")) },
            Consent { id: Some("c".into()), ..consent(ConsentStatus::Authorized, Some("t3")) },
        ];
        let usable = authorized_consents(list);
        let ids: Vec<_> = usable.iter().map(|c| c.effective_id()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
