//! In-memory collaborators for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::orchestrator::SourceProvider;
use super::store::{SeenStore, StoreError};
use crate::models::{Announcement, SourceDescriptor, SourceKind};
use crate::notify::OutboundChannel;
use crate::scrapers::{ExtractError, RecordExtractor};

pub fn announcement(source_id: &str, date: &str, title: &str) -> Announcement {
    Announcement::new(
        source_id,
        format!("Source {}", source_id),
        date,
        title,
        format!("https://example.edu/{}", source_id),
    )
}

pub fn source(id: &str) -> SourceDescriptor {
    SourceDescriptor::new(
        id,
        &format!("Source {}", id),
        &format!("https://example.edu/{}", id),
        SourceKind::Profile,
    )
}

#[derive(Default)]
pub struct MemoryStore {
    seen: Mutex<HashMap<String, DateTime<Utc>>>,
    status: Mutex<HashMap<String, String>>,
    has_calls: AtomicUsize,
    fail_has_after: Mutex<Option<usize>>,
    fail_records: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark(&self, announcement: &Announcement) {
        self.insert_at(&announcement.fingerprint(), Utc::now());
    }

    pub fn insert_at(&self, fingerprint: &str, at: DateTime<Utc>) {
        self.seen.lock().unwrap().insert(fingerprint.to_string(), at);
    }

    /// Make `has` fail once it has succeeded `calls` times.
    pub fn fail_has_after(&self, calls: usize) {
        *self.fail_has_after.lock().unwrap() = Some(calls);
    }

    pub fn fail_records(&self) {
        self.fail_records.store(true, Ordering::SeqCst);
    }

    pub fn status_value(&self, key: &str) -> Option<String> {
        self.status.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SeenStore for MemoryStore {
    async fn has(&self, fingerprint: &str) -> Result<bool, StoreError> {
        let calls = self.has_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = *self.fail_has_after.lock().unwrap() {
            if calls >= limit {
                return Err(StoreError::Unavailable("disk I/O error".to_string()));
            }
        }
        Ok(self.seen.lock().unwrap().contains_key(fingerprint))
    }

    async fn record(
        &self,
        fingerprint: &str,
        _source_id: &str,
        _title: &str,
        _published_date: &str,
    ) -> Result<(), StoreError> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read-only database".to_string()));
        }
        self.insert_at(fingerprint, Utc::now());
        Ok(())
    }

    async fn get_status(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.status_value(key))
    }

    async fn set_status(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.status
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn count_total(&self) -> Result<u64, StoreError> {
        Ok(self.seen.lock().unwrap().len() as u64)
    }

    async fn count_recent(&self, window: Duration) -> Result<u64, StoreError> {
        let Some(cutoff) = Utc::now().checked_sub_signed(window) else {
            return self.count_total().await;
        };
        Ok(self
            .seen
            .lock()
            .unwrap()
            .values()
            .filter(|at| **at >= cutoff)
            .count() as u64)
    }

    async fn purge_older_than(&self, age: Duration) -> Result<u64, StoreError> {
        let Some(cutoff) = Utc::now().checked_sub_signed(age) else {
            return Ok(0);
        };
        let mut seen = self.seen.lock().unwrap();
        let before = seen.len();
        seen.retain(|_, at| *at >= cutoff);
        Ok((before - seen.len()) as u64)
    }
}

/// Extractor returning canned results per source id.
#[derive(Default)]
pub struct StaticExtractor {
    results: HashMap<String, Result<Vec<Announcement>, String>>,
    calls: Mutex<Vec<String>>,
}

impl StaticExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, source_id: &str, records: Vec<Announcement>) -> Self {
        self.results.insert(source_id.to_string(), Ok(records));
        self
    }

    pub fn with_failure(mut self, source_id: &str, message: &str) -> Self {
        self.results
            .insert(source_id.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordExtractor for StaticExtractor {
    async fn extract(&self, source: &SourceDescriptor) -> Result<Vec<Announcement>, ExtractError> {
        self.calls.lock().unwrap().push(source.id.clone());
        match self.results.get(&source.id) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(message)) => Err(ExtractError::Parse(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Channel that records what it was asked to send.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Announcement>>,
    errors: Mutex<Vec<String>>,
    rejected_titles: HashSet<String>,
    fail_first: AtomicUsize,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every announcement with one of these titles.
    pub fn rejecting(titles: &[&str]) -> Self {
        Self {
            rejected_titles: titles.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Refuse the first `n` sends.
    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: AtomicUsize::new(n),
            ..Self::default()
        }
    }

    pub fn sent_titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.title.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutboundChannel for RecordingChannel {
    async fn send(&self, announcement: &Announcement) -> bool {
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return false;
        }
        if self.rejected_titles.contains(&announcement.title) {
            return false;
        }
        self.sent.lock().unwrap().push(announcement.clone());
        true
    }

    async fn notify_error(&self, message: &str) -> bool {
        self.errors.lock().unwrap().push(message.to_string());
        true
    }
}

/// Fixed list of enabled sources.
pub struct StaticSources(pub Vec<SourceDescriptor>);

#[async_trait]
impl SourceProvider for StaticSources {
    async fn enabled_sources(&self) -> Result<Vec<SourceDescriptor>, StoreError> {
        Ok(self.0.clone())
    }
}
