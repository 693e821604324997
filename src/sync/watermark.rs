use chrono::{DateTime, Duration, Utc};

use super::SAFETY_BACKOFF_DAYS;

/// Derive the effective fetch start for an account.
///
/// A known watermark is pulled back by the fixed safety backoff so
/// late-posted transactions at the source are not missed; the idempotent
/// identity makes the resulting overlap harmless. With no watermark the
/// fetch starts a bounded lookback before `now`. The backoff deliberately
/// does not apply on the lookback path.
pub fn effective_fetch_start(
    watermark: Option<DateTime<Utc>>,
    lookback_days: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match watermark {
        Some(latest) => latest - Duration::days(SAFETY_BACKOFF_DAYS),
        None => now - Duration::days(lookback_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_watermark_pulled_back_by_safety_backoff() {
        let watermark = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();

        let start = effective_fetch_start(Some(watermark), 30, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_no_watermark_uses_lookback_without_backoff() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();

        let start = effective_fetch_start(None, 30, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 16, 0, 0, 0).unwrap());

        let start = effective_fetch_start(None, 7, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 8, 0, 0, 0).unwrap());
    }
}
