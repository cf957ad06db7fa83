//! Delivery with persist-after-confirm.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::store::{SeenStore, StoreError};
use crate::models::Announcement;
use crate::notify::OutboundChannel;

/// Outcome of delivering one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sends confirmed by the channel (and recorded).
    pub delivered: usize,
    /// Sends attempted.
    pub attempted: usize,
    /// Sends the channel did not confirm.
    pub failed: usize,
    /// Records skipped because the same fingerprint was delivered earlier in the batch.
    pub duplicates: usize,
}

/// Sends new announcements and records each confirmed one.
pub struct DeliveryCoordinator<'a> {
    store: &'a dyn SeenStore,
    channel: &'a dyn OutboundChannel,
}

impl<'a> DeliveryCoordinator<'a> {
    pub fn new(store: &'a dyn SeenStore, channel: &'a dyn OutboundChannel) -> Self {
        Self { store, channel }
    }

    /// Deliver `records` in order.
    ///
    /// A record is recorded in the store right after the channel confirms it
    /// and never otherwise. Unconfirmed records are left for the next run.
    /// A store failure stops the batch; anything already recorded stays.
    pub async fn deliver(&self, records: Vec<Announcement>) -> Result<DeliveryReport, StoreError> {
        let mut report = DeliveryReport::default();
        let mut delivered_now: HashSet<String> = HashSet::new();

        for record in records {
            let fp = record.fingerprint();
            if delivered_now.contains(&fp) {
                debug!(source = %record.source_id, "Skipping duplicate in batch: {}", record.title);
                report.duplicates += 1;
                continue;
            }

            report.attempted += 1;
            if !self.channel.send(&record).await {
                warn!(source = %record.source_id, "Delivery failed: {}", record.title);
                report.failed += 1;
                continue;
            }

            self.store
                .record(&fp, &record.source_id, &record.title, &record.published_date)
                .await?;
            delivered_now.insert(fp);
            report.delivered += 1;
            debug!(source = %record.source_id, "Delivered: {}", record.title);
        }

        if report.attempted > 0 {
            info!(
                "Delivered {}/{} announcements",
                report.delivered, report.attempted
            );
        }

        Ok(report)
    }
}
