//! Persisted delivery records and the status register.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status key holding the timestamp of the most recent completed run.
pub const STATUS_LAST_CHECK: &str = "last_check";

/// Status key holding the administrator-configured check interval in minutes.
pub const STATUS_CHECK_INTERVAL: &str = "check_interval";

/// Interval reported when none has been configured.
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u32 = 5;

/// Smallest check interval the administration surface accepts.
pub const MIN_CHECK_INTERVAL_MINUTES: u32 = 5;

/// Largest check interval the administration surface accepts (24 hours).
pub const MAX_CHECK_INTERVAL_MINUTES: u32 = 1440;

/// Proof that an announcement was delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenEntry {
    pub fingerprint: String,
    pub source_id: String,
    pub title: String,
    pub published_date: String,
    /// When the entry was written, not when the announcement was published.
    pub recorded_at: DateTime<Utc>,
}

/// One key/value pair of the status register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate view shown by `status` surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenStats {
    pub total_seen: u64,
    pub last_24h: u64,
    pub last_check: Option<String>,
    pub check_interval: u32,
}

/// Validate an administrator-supplied check interval.
pub fn validate_check_interval(minutes: i64) -> Result<u32, String> {
    if minutes < MIN_CHECK_INTERVAL_MINUTES as i64 {
        return Err(format!(
            "Minimum interval is {} minutes",
            MIN_CHECK_INTERVAL_MINUTES
        ));
    }
    if minutes > MAX_CHECK_INTERVAL_MINUTES as i64 {
        return Err(format!(
            "Maximum interval is {} minutes (24 hours)",
            MAX_CHECK_INTERVAL_MINUTES
        ));
    }
    Ok(minutes as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_check_interval_bounds() {
        assert_eq!(validate_check_interval(5), Ok(5));
        assert_eq!(validate_check_interval(1440), Ok(1440));
        assert!(validate_check_interval(4).is_err());
        assert!(validate_check_interval(1441).is_err());
        assert!(validate_check_interval(-10).is_err());
    }
}
