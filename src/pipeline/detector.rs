//! Change detection against the seen-set.

use tracing::debug;

use super::store::{SeenStore, StoreError};
use crate::models::Announcement;

/// Filters candidate announcements down to those not yet delivered.
pub struct ChangeDetector<'a> {
    store: &'a dyn SeenStore,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(store: &'a dyn SeenStore) -> Self {
        Self { store }
    }

    /// Return the candidates whose fingerprint is unknown to the store, in
    /// their original order.
    ///
    /// Duplicates within `candidates` are kept; the delivery coordinator
    /// decides what to do with them. Any store failure aborts detection.
    pub async fn detect(
        &self,
        candidates: Vec<Announcement>,
    ) -> Result<Vec<Announcement>, StoreError> {
        let mut fresh = Vec::new();
        for announcement in candidates {
            let fp = announcement.fingerprint();
            if self.store.has(&fp).await? {
                debug!(source = %announcement.source_id, "Already seen: {}", announcement.title);
                continue;
            }
            debug!(source = %announcement.source_id, "New: {}", announcement.title);
            fresh.push(announcement);
        }
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{announcement, MemoryStore};

    #[tokio::test]
    async fn test_detect_is_stable_filter() {
        let store = MemoryStore::new();
        let a = announcement("s1", "01.01.2026", "A");
        let b = announcement("s1", "02.01.2026", "B");
        let c = announcement("s2", "03.01.2026", "C");
        store.mark(&b).await;

        let fresh = ChangeDetector::new(&store)
            .detect(vec![a.clone(), b, c.clone()])
            .await
            .unwrap();

        assert_eq!(fresh, vec![a, c]);
    }

    #[tokio::test]
    async fn test_detect_keeps_intra_batch_duplicates() {
        let store = MemoryStore::new();
        let a = announcement("s1", "01.01.2026", "A");

        let fresh = ChangeDetector::new(&store)
            .detect(vec![a.clone(), a.clone()])
            .await
            .unwrap();

        assert_eq!(fresh.len(), 2);
    }

    #[tokio::test]
    async fn test_detect_same_triple_other_body_is_seen() {
        let store = MemoryStore::new();
        let original = announcement("s1", "01.01.2026", "A").with_body("first wording");
        store.mark(&original).await;

        let edited = announcement("s1", "01.01.2026", "A").with_body("second wording");
        let fresh = ChangeDetector::new(&store).detect(vec![edited]).await.unwrap();

        assert!(fresh.is_empty());
    }

    #[tokio::test]
    async fn test_detect_propagates_store_failure() {
        let store = MemoryStore::new();
        store.fail_has_after(0);

        let result = ChangeDetector::new(&store)
            .detect(vec![announcement("s1", "01.01.2026", "A")])
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
