//! Manual run trigger through GitHub Actions `workflow_dispatch`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{info, warn};

use super::AdminError;
use crate::config::GithubSettings;

/// Starts the scheduled check workflow on demand.
#[derive(Clone)]
pub struct WorkflowTrigger {
    client: Client,
    settings: GithubSettings,
}

impl WorkflowTrigger {
    pub fn new(settings: GithubSettings, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(crate::scrapers::http_client::USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    fn dispatch_url(&self, repo: &str) -> String {
        format!(
            "{}/repos/{}/actions/workflows/{}/dispatches",
            self.settings.api_base.trim_end_matches('/'),
            repo,
            self.settings.workflow
        )
    }

    /// Request a workflow run. Succeeds only on `204 No Content`.
    pub async fn trigger(&self) -> Result<(), AdminError> {
        let (Some(token), Some(repo)) = (
            self.settings.token.as_deref().filter(|t| !t.is_empty()),
            self.settings.repo.as_deref().filter(|r| !r.is_empty()),
        ) else {
            return Err(AdminError::DispatchNotConfigured);
        };

        let response = self
            .client
            .post(self.dispatch_url(repo))
            .header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&json!({ "ref": self.settings.git_ref }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            info!("Triggered workflow {} on {}", self.settings.workflow, repo);
            Ok(())
        } else {
            warn!("Workflow dispatch rejected with {}", status);
            Err(AdminError::DispatchRejected(status.as_u16()))
        }
    }
}
