//! HTTP client for fetching source pages.

mod user_agent;

pub use user_agent::{resolve_user_agent, BROWSER_USER_AGENT, USER_AGENT};

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::ExtractError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with a request timeout and user agent configuration
    /// (see [`resolve_user_agent`]).
    pub fn new(timeout: Duration, user_agent_config: Option<&str>) -> Self {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// GET a page and return its body as text. Non-success statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, ExtractError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
