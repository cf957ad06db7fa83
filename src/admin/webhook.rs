//! Telegram webhook server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::handler::AdminHandler;
use crate::config::Settings;
use crate::notify::TelegramClient;

#[derive(Debug, Deserialize)]
struct Update {
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    from: Option<User>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
}

/// Shared state for the webhook server.
#[derive(Clone)]
pub struct WebhookState {
    pub handler: Arc<AdminHandler>,
    pub telegram: Arc<TelegramClient>,
}

impl WebhookState {
    pub fn new(handler: AdminHandler, telegram: TelegramClient) -> Self {
        Self {
            handler: Arc::new(handler),
            telegram: Arc::new(telegram),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            AdminHandler::from_settings(settings),
            TelegramClient::from_settings(settings),
        )
    }
}

/// Create the webhook router.
pub fn create_router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .with_state(state)
}

async fn health() -> &'static str {
    "noticewatch webhook is running"
}

/// Always answers 200 so Telegram does not redeliver the update.
async fn webhook(State(state): State<WebhookState>, body: Bytes) -> (StatusCode, &'static str) {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(e) => {
            warn!("Ignoring unreadable update: {}", e);
            return (StatusCode::OK, "OK");
        }
    };

    let Some(message) = update.message else {
        return (StatusCode::OK, "OK");
    };
    let (Some(text), Some(from)) = (message.text.as_deref(), message.from.as_ref()) else {
        return (StatusCode::OK, "OK");
    };

    debug!("Update from {} in chat {}", from.id, message.chat.id);
    if let Some(reply) = state.handler.handle(&from.id.to_string(), text).await {
        let chat_id = message.chat.id.to_string();
        if !state.telegram.send_message(&chat_id, &reply).await {
            warn!("Could not reply in chat {}", chat_id);
        }
    }

    (StatusCode::OK, "OK")
}

/// Run the webhook server until the process is stopped.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(WebhookState::from_settings(settings));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting webhook server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
