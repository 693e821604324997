pub mod dates;
pub mod materialize;
pub mod orchestrator;
pub mod scheduler;
pub mod watermark;

/// Fixed safety backoff subtracted from a watermark so late-arriving or
/// out-of-order transactions at the source are re-fetched.
pub const SAFETY_BACKOFF_DAYS: i64 = 2;

/// Lookback applied when an account has no stored records and no override
/// was supplied.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
