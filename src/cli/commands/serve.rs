//! Webhook server and connectivity commands.

use console::style;

use crate::config::Settings;
use crate::notify::TelegramClient;

use super::helpers::{open_database, warn_if_unconfigured};

/// Start the webhook server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    println!("{} Running database migrations...", style("→").cyan());
    open_database(settings).await?;
    println!("  {} Database ready", style("✓").green());
    warn_if_unconfigured(settings);

    println!(
        "{} Starting webhook server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Point the bot's webhook at /webhook. Press Ctrl+C to stop");

    crate::admin::serve(settings, &host, port).await
}

/// Verify the bot token with `getMe`.
pub async fn cmd_ping(settings: &Settings) -> anyhow::Result<()> {
    let telegram = TelegramClient::from_settings(settings);
    if telegram.test_connection().await {
        println!("{} Telegram bot token is valid", style("✓").green());
        Ok(())
    } else {
        anyhow::bail!("Telegram getMe failed; check TELEGRAM_BOT_TOKEN")
    }
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    Ok((bind.to_string(), 3030))
}
