use chrono::{DateTime, NaiveDate, Utc};

/// Date-bearing fields probed on a raw transaction, in priority order.
/// The first field holding a parseable value wins. The chain's length and
/// order are load-bearing: they determine both the normalized timestamp on
/// stored records and the watermark extracted from them.
const DATE_FIELDS: [&str; 7] = [
    "bookingDateTime",
    "timestamp",
    "valueDateTime",
    "valueDate",
    "date",
    "createdAt",
    "updatedAt",
];

/// Extract the best-effort timestamp from a raw transaction payload.
pub fn pick_date(payload: &serde_json::Value) -> Option<DateTime<Utc>> {
    DATE_FIELDS
        .iter()
        .filter_map(|field| payload.get(*field))
        .filter_map(|value| value.as_str())
        .find_map(parse_timestamp)
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_booking_datetime_wins_over_timestamp() {
        let payload = json!({
            "timestamp": "2024-02-01T00:00:00Z",
            "bookingDateTime": "2024-01-15T10:30:00Z",
        });
        assert_eq!(
            pick_date(&payload),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_falls_through_to_later_fields() {
        let payload = json!({
            "valueDate": "2024-03-10",
            "updatedAt": "2024-03-12T08:00:00Z",
        });
        assert_eq!(
            pick_date(&payload),
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_skips_empty_and_unparseable_values() {
        let payload = json!({
            "bookingDateTime": "",
            "timestamp": "not a date",
            "date": "2024-05-01T12:00:00+01:00",
        });
        assert_eq!(
            pick_date(&payload),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_no_date_fields_yields_none() {
        assert_eq!(pick_date(&json!({ "amount": 12.5 })), None);
        assert_eq!(pick_date(&json!({ "bookingDateTime": 1700000000 })), None);
    }
}
