//! Tracking preferences: which catalog sources are checked.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::info;

use super::models::{NewTrackedSource, TrackedSourceRecord};
use super::pool::{AsyncSqlitePool, DieselError};
use super::util::{format_timestamp, parse_timestamp};
use crate::models::{CatalogEntry, SourceDescriptor, SourceKind};
use crate::pipeline::{SourceProvider, StoreError};
use crate::schema::tracked_sources;

impl From<TrackedSourceRecord> for SourceDescriptor {
    fn from(record: TrackedSourceRecord) -> Self {
        SourceDescriptor {
            id: record.id,
            name: record.name,
            url: record.url,
            kind: SourceKind::from_str(&record.kind).unwrap_or(SourceKind::Profile),
            position: record.position,
            enabled: record.enabled,
            updated_at: parse_timestamp(&record.updated_at),
        }
    }
}

/// Outcome of syncing the catalog into the tracking table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

#[derive(Clone)]
pub struct DieselTrackingRepository {
    pool: AsyncSqlitePool,
}

impl DieselTrackingRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Bring the tracking table in line with the configured catalog.
    ///
    /// New entries are appended enabled, after the highest existing
    /// position. Existing entries keep their flag and position but take the
    /// catalog's name, URL and kind. Rows absent from the catalog are deleted.
    pub async fn sync_catalog(&self, catalog: &[CatalogEntry]) -> Result<SyncSummary, DieselError> {
        let existing = self.list().await?;
        let mut conn = self.pool.get().await?;
        let now = format_timestamp(Utc::now());
        let mut summary = SyncSummary::default();

        let mut next_position = existing.iter().map(|s| s.position).max().unwrap_or(0) + 1;
        let known: HashSet<&str> = existing.iter().map(|s| s.id.as_str()).collect();
        let wanted: HashSet<&str> = catalog.iter().map(|e| e.id.as_str()).collect();

        for entry in catalog {
            if known.contains(entry.id.as_str()) {
                let rows = diesel::update(tracked_sources::table.find(&entry.id))
                    .set((
                        tracked_sources::name.eq(&entry.name),
                        tracked_sources::url.eq(&entry.url),
                        tracked_sources::kind.eq(entry.kind.as_str()),
                    ))
                    .execute(&mut conn)
                    .await?;
                summary.updated += rows;
                continue;
            }

            diesel::insert_or_ignore_into(tracked_sources::table)
                .values(&NewTrackedSource {
                    id: &entry.id,
                    name: &entry.name,
                    url: &entry.url,
                    kind: entry.kind.as_str(),
                    position: next_position,
                    enabled: true,
                    updated_at: &now,
                })
                .execute(&mut conn)
                .await?;
            next_position += 1;
            summary.added += 1;
        }

        let stale: Vec<&str> = known.difference(&wanted).copied().collect();
        if !stale.is_empty() {
            summary.removed = diesel::delete(
                tracked_sources::table.filter(tracked_sources::id.eq_any(stale)),
            )
            .execute(&mut conn)
            .await?;
        }

        if summary.added > 0 || summary.removed > 0 {
            info!(
                "Synced source catalog: {} added, {} removed",
                summary.added, summary.removed
            );
        }

        Ok(summary)
    }

    /// All tracked sources ordered by position.
    pub async fn list(&self) -> Result<Vec<SourceDescriptor>, DieselError> {
        let mut conn = self.pool.get().await?;

        tracked_sources::table
            .order(tracked_sources::position.asc())
            .load::<TrackedSourceRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(SourceDescriptor::from).collect())
    }

    /// Enabled sources ordered by position.
    pub async fn enabled(&self) -> Result<Vec<SourceDescriptor>, DieselError> {
        let mut conn = self.pool.get().await?;

        tracked_sources::table
            .filter(tracked_sources::enabled.eq(true))
            .order(tracked_sources::position.asc())
            .load::<TrackedSourceRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(SourceDescriptor::from).collect())
    }

    /// Set the flag of the source at `position`. Returns `None` if no source has it.
    pub async fn set_enabled(
        &self,
        position: i32,
        enabled: bool,
    ) -> Result<Option<SourceDescriptor>, DieselError> {
        let mut conn = self.pool.get().await?;
        let now = format_timestamp(Utc::now());

        let rows = diesel::update(
            tracked_sources::table.filter(tracked_sources::position.eq(position)),
        )
        .set((
            tracked_sources::enabled.eq(enabled),
            tracked_sources::updated_at.eq(&now),
        ))
        .execute(&mut conn)
        .await?;

        if rows == 0 {
            return Ok(None);
        }

        tracked_sources::table
            .filter(tracked_sources::position.eq(position))
            .first::<TrackedSourceRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(SourceDescriptor::from))
    }

    /// Set the flag of every source. Returns the number of rows touched.
    pub async fn set_all(&self, enabled: bool) -> Result<usize, DieselError> {
        let mut conn = self.pool.get().await?;
        let now = format_timestamp(Utc::now());

        diesel::update(tracked_sources::table)
            .set((
                tracked_sources::enabled.eq(enabled),
                tracked_sources::updated_at.eq(&now),
            ))
            .execute(&mut conn)
            .await
    }
}

#[async_trait]
impl SourceProvider for DieselTrackingRepository {
    async fn enabled_sources(&self) -> Result<Vec<SourceDescriptor>, StoreError> {
        Ok(self.enabled().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::migrations::run_migrations;
    use tempfile::tempdir;

    async fn setup_test_db() -> (DieselTrackingRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_url = dir.path().join("test.db").display().to_string();
        run_migrations(&db_url).await.unwrap();
        (
            DieselTrackingRepository::new(AsyncSqlitePool::new(&db_url)),
            dir,
        )
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("ayse", "Ayşe Yılmaz", "https://x.edu/ayse", SourceKind::Profile),
            CatalogEntry::new("mehmet", "Mehmet Kaya", "https://x.edu/mehmet", SourceKind::Profile),
            CatalogEntry::new("eee", "EEE Department", "https://eee.x.edu", SourceKind::Department),
        ]
    }

    #[tokio::test]
    async fn test_sync_assigns_positions_in_catalog_order() {
        let (repo, _dir) = setup_test_db().await;

        let summary = repo.sync_catalog(&catalog()).await.unwrap();
        assert_eq!(summary.added, 3);

        let all = repo.list().await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| (s.position, s.id.as_str())).collect();
        assert_eq!(ids, vec![(1, "ayse"), (2, "mehmet"), (3, "eee")]);
        assert!(all.iter().all(|s| s.enabled));
        assert_eq!(all[2].kind, SourceKind::Department);
    }

    #[tokio::test]
    async fn test_resync_preserves_flags() {
        let (repo, _dir) = setup_test_db().await;
        repo.sync_catalog(&catalog()).await.unwrap();
        repo.set_enabled(2, false).await.unwrap();

        let mut renamed = catalog();
        renamed[1].name = "Prof. Mehmet Kaya".to_string();
        let summary = repo.sync_catalog(&renamed).await.unwrap();
        assert_eq!(summary.added, 0);

        let all = repo.list().await.unwrap();
        assert_eq!(all[1].name, "Prof. Mehmet Kaya");
        assert!(!all[1].enabled);
    }

    #[tokio::test]
    async fn test_sync_appends_and_removes() {
        let (repo, _dir) = setup_test_db().await;
        repo.sync_catalog(&catalog()).await.unwrap();

        let mut changed = catalog();
        changed.remove(0);
        changed.push(CatalogEntry::new("zeynep", "Zeynep Demir", "https://x.edu/zeynep", SourceKind::Profile));
        let summary = repo.sync_catalog(&changed).await.unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.removed, 1);

        let all = repo.list().await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| (s.position, s.id.as_str())).collect();
        assert_eq!(ids, vec![(2, "mehmet"), (3, "eee"), (4, "zeynep")]);
    }

    #[tokio::test]
    async fn test_enabled_filters_and_orders() {
        let (repo, _dir) = setup_test_db().await;
        repo.sync_catalog(&catalog()).await.unwrap();

        let updated = repo.set_enabled(1, false).await.unwrap().unwrap();
        assert_eq!(updated.id, "ayse");
        assert!(!updated.enabled);

        let enabled = repo.enabled_sources().await.unwrap();
        let ids: Vec<_> = enabled.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["mehmet", "eee"]);
    }

    #[tokio::test]
    async fn test_set_enabled_unknown_position() {
        let (repo, _dir) = setup_test_db().await;
        repo.sync_catalog(&catalog()).await.unwrap();
        assert!(repo.set_enabled(42, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_all() {
        let (repo, _dir) = setup_test_db().await;
        repo.sync_catalog(&catalog()).await.unwrap();

        assert_eq!(repo.set_all(false).await.unwrap(), 3);
        assert!(repo.enabled().await.unwrap().is_empty());

        repo.set_all(true).await.unwrap();
        assert_eq!(repo.enabled().await.unwrap().len(), 3);
    }
}
