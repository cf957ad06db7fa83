//! Record extraction from announcement sources.

pub mod department;
pub mod extract;
pub mod http_client;
pub mod profile;

pub use http_client::HttpClient;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Announcement, SourceDescriptor, SourceKind};

/// Errors that can occur while extracting a source.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Produces the current announcements of one source, in page order.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    async fn extract(&self, source: &SourceDescriptor) -> Result<Vec<Announcement>, ExtractError>;
}

/// Extractor that fetches pages over HTTP and dispatches on the source kind.
#[derive(Clone)]
pub struct PageExtractor {
    client: HttpClient,
}

impl PageExtractor {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn with_settings(timeout: Duration, user_agent: Option<&str>) -> Self {
        Self::new(HttpClient::new(timeout, user_agent))
    }
}

#[async_trait]
impl RecordExtractor for PageExtractor {
    async fn extract(&self, source: &SourceDescriptor) -> Result<Vec<Announcement>, ExtractError> {
        match source.kind {
            SourceKind::Profile => profile::extract(&self.client, source).await,
            SourceKind::Department => department::extract(&self.client, source).await,
        }
    }
}
