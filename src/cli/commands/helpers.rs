//! Shared helper functions for CLI commands.

use console::style;

use crate::config::Settings;
use crate::notify::OutboundChannel;
use crate::repository::DbContext;

/// Open the database, applying pending migrations and syncing the source
/// catalog into the tracking table.
pub async fn open_database(settings: &Settings) -> anyhow::Result<DbContext> {
    settings.ensure_directories()?;

    let ctx = settings.create_db_context();
    let applied = ctx
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
    for name in &applied {
        tracing::info!("Applied migration {}", name);
    }

    let summary = ctx.tracking().sync_catalog(&settings.catalog).await?;
    if summary.added + summary.removed > 0 {
        tracing::info!(
            "Catalog synced: {} added, {} updated, {} removed",
            summary.added,
            summary.updated,
            summary.removed
        );
    }

    Ok(ctx)
}

/// Open the database, alerting the operator through `channel` when that fails.
pub async fn open_or_notify(
    settings: &Settings,
    channel: &dyn OutboundChannel,
) -> anyhow::Result<DbContext> {
    match open_database(settings).await {
        Ok(ctx) => Ok(ctx),
        Err(e) => {
            tracing::error!("Run aborted: {:#}", e);
            if !channel.notify_error(&format!("{:#}", e)).await {
                tracing::warn!("Could not deliver error notification");
            }
            Err(e)
        }
    }
}

/// Warn when the Telegram channel cannot deliver anything.
pub fn warn_if_unconfigured(settings: &Settings) {
    if !settings.telegram.is_configured() {
        eprintln!(
            "{} TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is not set; deliveries will fail",
            style("!").yellow()
        );
    }
}

/// Truncate a string for table display.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
