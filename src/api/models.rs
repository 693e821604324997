use serde::{Deserialize, Serialize};

use crate::transactions::models::SyncSummary;

/// Query-string inputs for the on-demand sync endpoint. Everything arrives
/// as a string; `account_ids` is comma-separated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuery {
    pub user_id: Option<String>,
    pub account_ids: Option<String>,
    pub lookback_days: Option<String>,
}

/// JSON body inputs for the on-demand sync endpoint (POST).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBody {
    pub user_id: Option<String>,
    pub account_ids: Option<AccountIdsParam>,
    pub lookback_days: Option<LookbackParam>,
}

/// `accountIds` may be a JSON array or a comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AccountIdsParam {
    List(Vec<String>),
    Csv(String),
}

impl AccountIdsParam {
    pub fn into_ids(self) -> Vec<String> {
        match self {
            AccountIdsParam::List(ids) => ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            AccountIdsParam::Csv(csv) => parse_account_ids_csv(&csv),
        }
    }
}

/// `lookbackDays` may arrive as a JSON number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LookbackParam {
    Number(i64),
    Text(String),
}

pub fn parse_account_ids_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-user outcome in the on-demand response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSyncResult {
    pub user_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SyncSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub processed: usize,
    pub results: Vec<UserSyncResult>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parsing_trims_and_drops_empties() {
        assert_eq!(
            parse_account_ids_csv(" a-1, a-2 ,, a-3 "),
            vec!["a-1", "a-2", "a-3"]
        );
        assert!(parse_account_ids_csv("").is_empty());
        assert!(parse_account_ids_csv(" , ").is_empty());
    }

    #[test]
    fn test_account_ids_accepts_array_or_csv() {
        let param: AccountIdsParam =
            serde_json::from_value(serde_json::json!(["a-1", " a-2 "])).unwrap();
        assert_eq!(param.into_ids(), vec!["a-1", "a-2"]);

        let param: AccountIdsParam = serde_json::from_value(serde_json::json!("a-1,a-2")).unwrap();
        assert_eq!(param.into_ids(), vec!["a-1", "a-2"]);
    }

    #[test]
    fn test_lookback_accepts_number_or_string() {
        let param: LookbackParam = serde_json::from_value(serde_json::json!(14)).unwrap();
        assert!(matches!(param, LookbackParam::Number(14)));

        let param: LookbackParam = serde_json::from_value(serde_json::json!("14")).unwrap();
        assert!(matches!(param, LookbackParam::Text(ref s) if s == "14"));
    }
}
