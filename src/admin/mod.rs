//! Administration surface: bot commands, manual run trigger and webhook server.

pub mod command;
pub mod dispatch;
pub mod handler;
pub mod webhook;

pub use command::AdminCommand;
pub use dispatch::WorkflowTrigger;
pub use handler::AdminHandler;
pub use webhook::{create_router, serve, WebhookState};

use thiserror::Error;

use crate::pipeline::StoreError;

/// Errors from executing an admin command.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Workflow dispatch needs a GitHub token and repository")]
    DispatchNotConfigured,

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub rejected the workflow dispatch (HTTP {0})")]
    DispatchRejected(u16),
}
