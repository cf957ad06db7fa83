//! Diesel-backed seen-set store for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{SeenRecord, StatusRecord};
use super::pool::{AsyncSqlitePool, DieselError};
use super::util::{format_timestamp, parse_timestamp};
use crate::models::{SeenEntry, StatusEntry};
use crate::pipeline::{SeenStore, StoreError};
use crate::schema::{bot_status, seen_announcements};

impl From<SeenRecord> for SeenEntry {
    fn from(record: SeenRecord) -> Self {
        SeenEntry {
            fingerprint: record.fingerprint,
            source_id: record.source_id,
            title: record.title,
            published_date: record.published_date,
            recorded_at: parse_timestamp(&record.recorded_at),
        }
    }
}

impl From<StatusRecord> for StatusEntry {
    fn from(record: StatusRecord) -> Self {
        StatusEntry {
            key: record.key,
            value: record.value,
            updated_at: parse_timestamp(&record.updated_at),
        }
    }
}

/// Seen-set and status register stored in `seen_announcements` and `bot_status`.
#[derive(Clone)]
pub struct DieselSeenStore {
    pool: AsyncSqlitePool,
}

impl DieselSeenStore {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert a seen entry with an explicit timestamp.
    pub async fn record_at(
        &self,
        fingerprint: &str,
        source_id: &str,
        title: &str,
        published_date: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        let recorded_at = format_timestamp(recorded_at);

        diesel::replace_into(seen_announcements::table)
            .values((
                seen_announcements::fingerprint.eq(fingerprint),
                seen_announcements::source_id.eq(source_id),
                seen_announcements::title.eq(title),
                seen_announcements::published_date.eq(published_date),
                seen_announcements::recorded_at.eq(&recorded_at),
            ))
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Get a seen entry by fingerprint.
    pub async fn get(&self, fingerprint: &str) -> Result<Option<SeenEntry>, DieselError> {
        let mut conn = self.pool.get().await?;

        seen_announcements::table
            .find(fingerprint)
            .first::<SeenRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(SeenEntry::from))
    }

    /// Get a status entry with its update time.
    pub async fn status_entry(&self, key: &str) -> Result<Option<StatusEntry>, DieselError> {
        let mut conn = self.pool.get().await?;

        bot_status::table
            .find(key)
            .first::<StatusRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(StatusEntry::from))
    }

    async fn count_since(&self, cutoff: DateTime<Utc>) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;
        let cutoff = format_timestamp(cutoff);

        let count: i64 = seen_announcements::table
            .filter(seen_announcements::recorded_at.ge(&cutoff))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count as u64)
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;
        let cutoff = format_timestamp(cutoff);

        let rows = diesel::delete(
            seen_announcements::table.filter(seen_announcements::recorded_at.lt(&cutoff)),
        )
        .execute(&mut conn)
        .await?;

        Ok(rows as u64)
    }
}

#[async_trait]
impl SeenStore for DieselSeenStore {
    async fn has(&self, fingerprint: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count: i64 = seen_announcements::table
            .filter(seen_announcements::fingerprint.eq(fingerprint))
            .select(count_star())
            .first(&mut conn)
            .await?;

        Ok(count > 0)
    }

    async fn record(
        &self,
        fingerprint: &str,
        source_id: &str,
        title: &str,
        published_date: &str,
    ) -> Result<(), StoreError> {
        self.record_at(fingerprint, source_id, title, published_date, Utc::now())
            .await?;
        Ok(())
    }

    async fn get_status(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.status_entry(key).await?.map(|entry| entry.value))
    }

    async fn set_status(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        let now = format_timestamp(Utc::now());

        diesel::replace_into(bot_status::table)
            .values((
                bot_status::key.eq(key),
                bot_status::value.eq(value),
                bot_status::updated_at.eq(&now),
            ))
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn count_total(&self) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count: i64 = seen_announcements::table
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count as u64)
    }

    async fn count_recent(&self, window: Duration) -> Result<u64, StoreError> {
        // A window reaching past the earliest representable time covers everything.
        match Utc::now().checked_sub_signed(window) {
            Some(cutoff) => Ok(self.count_since(cutoff).await?),
            None => self.count_total().await,
        }
    }

    async fn purge_older_than(&self, age: Duration) -> Result<u64, StoreError> {
        match Utc::now().checked_sub_signed(age) {
            Some(cutoff) => Ok(self.purge_before(cutoff).await?),
            None => Ok(0),
        }
    }
}
