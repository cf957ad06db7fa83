//! One complete check run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::delivery::{DeliveryCoordinator, DeliveryReport};
use super::detector::ChangeDetector;
use super::store::{SeenStore, StoreError};
use crate::models::{Announcement, SourceDescriptor, STATUS_LAST_CHECK};
use crate::notify::OutboundChannel;
use crate::repository::util::format_timestamp;
use crate::scrapers::RecordExtractor;

/// Supplies the sources a run should check, in check order.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn enabled_sources(&self) -> Result<Vec<SourceDescriptor>, StoreError>;
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Seen-set store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Could not load tracked sources: {0}")]
    Tracking(StoreError),
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub sources_checked: usize,
    /// Ids of sources whose extraction failed.
    pub failed_sources: Vec<String>,
    /// Candidates produced by all sources.
    pub extracted: usize,
    /// Candidates not yet in the seen-set.
    pub new: usize,
    pub delivered: usize,
    pub attempted: usize,
    pub failed_deliveries: usize,
    pub duplicates: usize,
    pub finished_at: DateTime<Utc>,
}

/// Summary of a seeding pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub sources_checked: usize,
    pub failed_sources: Vec<String>,
    pub recorded: usize,
    pub already_seen: usize,
}

/// Runs extract, detect, deliver and bookkeeping in sequence.
pub struct RunOrchestrator<'a> {
    sources: &'a dyn SourceProvider,
    extractor: &'a dyn RecordExtractor,
    store: &'a dyn SeenStore,
    channel: &'a dyn OutboundChannel,
}

impl<'a> RunOrchestrator<'a> {
    pub fn new(
        sources: &'a dyn SourceProvider,
        extractor: &'a dyn RecordExtractor,
        store: &'a dyn SeenStore,
        channel: &'a dyn OutboundChannel,
    ) -> Self {
        Self {
            sources,
            extractor,
            store,
            channel,
        }
    }

    /// Perform one run.
    ///
    /// Extraction failures are isolated per source. Delivery failures are
    /// counted and left for the next run. A store failure aborts the run
    /// before `last_check` is written.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let sources = self
            .sources
            .enabled_sources()
            .await
            .map_err(RunError::Tracking)?;
        info!("Checking {} tracked sources", sources.len());

        let (candidates, failed_sources) = self.extract_all(&sources).await;
        let extracted = candidates.len();

        let fresh = ChangeDetector::new(self.store).detect(candidates).await?;
        let new = fresh.len();

        let delivery = if fresh.is_empty() {
            DeliveryReport::default()
        } else {
            DeliveryCoordinator::new(self.store, self.channel)
                .deliver(fresh)
                .await?
        };

        let finished_at = Utc::now();
        self.store
            .set_status(STATUS_LAST_CHECK, &format_timestamp(finished_at))
            .await?;

        info!(
            "Run complete: {} sources, {} candidates, {} new, {}/{} delivered",
            sources.len(),
            extracted,
            new,
            delivery.delivered,
            delivery.attempted
        );

        Ok(RunReport {
            sources_checked: sources.len(),
            failed_sources,
            extracted,
            new,
            delivered: delivery.delivered,
            attempted: delivery.attempted,
            failed_deliveries: delivery.failed,
            duplicates: delivery.duplicates,
            finished_at,
        })
    }

    /// Perform one run and tell the operator if it aborts.
    ///
    /// The notification is best effort; its outcome does not change the
    /// returned error.
    pub async fn run_or_notify(&self) -> Result<RunReport, RunError> {
        match self.run().await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!("Run aborted: {}", e);
                if !self.channel.notify_error(&e.to_string()).await {
                    warn!("Could not deliver error notification");
                }
                Err(e)
            }
        }
    }

    /// Record every announcement currently published by the enabled sources
    /// without delivering anything.
    ///
    /// Used to bootstrap an empty store so the first real run does not
    /// announce the whole backlog.
    pub async fn seed(&self) -> Result<SeedReport, RunError> {
        let sources = self
            .sources
            .enabled_sources()
            .await
            .map_err(RunError::Tracking)?;
        let (candidates, failed_sources) = self.extract_all(&sources).await;

        let mut report = SeedReport {
            sources_checked: sources.len(),
            failed_sources,
            ..SeedReport::default()
        };

        for announcement in candidates {
            let fp = announcement.fingerprint();
            if self.store.has(&fp).await? {
                report.already_seen += 1;
                continue;
            }
            self.store
                .record(
                    &fp,
                    &announcement.source_id,
                    &announcement.title,
                    &announcement.published_date,
                )
                .await?;
            report.recorded += 1;
        }

        info!(
            "Seeded {} announcements ({} already seen)",
            report.recorded, report.already_seen
        );
        Ok(report)
    }

    async fn extract_all(
        &self,
        sources: &[SourceDescriptor],
    ) -> (Vec<Announcement>, Vec<String>) {
        let mut candidates = Vec::new();
        let mut failed = Vec::new();

        for source in sources {
            match self.extractor.extract(source).await {
                Ok(records) => {
                    debug!(source = %source.id, "Extracted {} announcements", records.len());
                    candidates.extend(records);
                }
                Err(e) => {
                    warn!(source = %source.id, "Extraction failed for {}: {}", source.name, e);
                    failed.push(source.id.clone());
                }
            }
        }

        (candidates, failed)
    }
}
