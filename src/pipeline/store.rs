//! Seen-set store abstraction.

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

use crate::models::{SeenStats, DEFAULT_CHECK_INTERVAL_MINUTES, STATUS_CHECK_INTERVAL, STATUS_LAST_CHECK};

/// Errors from the seen-set store. Always fatal to the current run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable set of delivered fingerprints plus a key/value status register.
///
/// Implementations must survive process restarts. Both `record` and
/// `set_status` are upserts, so repeating them is harmless.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether the fingerprint has been recorded.
    async fn has(&self, fingerprint: &str) -> Result<bool, StoreError>;

    /// Record a delivered announcement.
    async fn record(
        &self,
        fingerprint: &str,
        source_id: &str,
        title: &str,
        published_date: &str,
    ) -> Result<(), StoreError>;

    /// Read a value from the status register.
    async fn get_status(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value to the status register, replacing any previous one.
    async fn set_status(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Number of recorded fingerprints.
    async fn count_total(&self) -> Result<u64, StoreError>;

    /// Number of entries recorded within `window` of now.
    async fn count_recent(&self, window: Duration) -> Result<u64, StoreError>;

    /// Delete entries recorded more than `age` ago. Returns how many were removed.
    async fn purge_older_than(&self, age: Duration) -> Result<u64, StoreError>;
}

/// Gather the figures shown by status surfaces.
pub async fn load_stats(store: &dyn SeenStore) -> Result<SeenStats, StoreError> {
    let total_seen = store.count_total().await?;
    let last_24h = store.count_recent(Duration::hours(24)).await?;
    let last_check = store.get_status(STATUS_LAST_CHECK).await?;
    let check_interval = store
        .get_status(STATUS_CHECK_INTERVAL)
        .await?
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_CHECK_INTERVAL_MINUTES);

    Ok(SeenStats {
        total_seen,
        last_24h,
        last_check,
        check_interval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::MemoryStore;

    #[tokio::test]
    async fn test_load_stats_defaults() {
        let store = MemoryStore::new();
        let stats = load_stats(&store).await.unwrap();
        assert_eq!(stats.total_seen, 0);
        assert_eq!(stats.last_24h, 0);
        assert_eq!(stats.last_check, None);
        assert_eq!(stats.check_interval, DEFAULT_CHECK_INTERVAL_MINUTES);
    }

    #[tokio::test]
    async fn test_load_stats_reads_register() {
        let store = MemoryStore::new();
        store.record("fp", "src", "t", "d").await.unwrap();
        store.set_status(STATUS_CHECK_INTERVAL, "30").await.unwrap();
        store
            .set_status(STATUS_LAST_CHECK, "2026-01-05T10:00:00.000000Z")
            .await
            .unwrap();

        let stats = load_stats(&store).await.unwrap();
        assert_eq!(stats.total_seen, 1);
        assert_eq!(stats.last_24h, 1);
        assert_eq!(stats.check_interval, 30);
        assert_eq!(
            stats.last_check.as_deref(),
            Some("2026-01-05T10:00:00.000000Z")
        );
    }

    #[tokio::test]
    async fn test_load_stats_ignores_garbage_interval() {
        let store = MemoryStore::new();
        store.set_status(STATUS_CHECK_INTERVAL, "soon").await.unwrap();
        let stats = load_stats(&store).await.unwrap();
        assert_eq!(stats.check_interval, DEFAULT_CHECK_INTERVAL_MINUTES);
    }

    #[tokio::test]
    async fn test_huge_window_counts_all_and_purges_none() {
        let store = MemoryStore::new();
        store.record("fp", "src", "t", "d").await.unwrap();
        let age = Duration::days(100_000_000);

        assert_eq!(store.count_recent(age).await.unwrap(), 1);
        assert_eq!(store.purge_older_than(age).await.unwrap(), 0);
        assert_eq!(store.count_total().await.unwrap(), 1);
    }
}
