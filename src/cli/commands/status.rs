//! Status, purge and interval commands.

use chrono::Duration;
use console::style;
use serde::Serialize;

use crate::config::Settings;
use crate::models::{validate_check_interval, SeenStats, STATUS_CHECK_INTERVAL};
use crate::pipeline::{load_stats, SeenStore};

use super::helpers::open_database;

#[derive(Serialize)]
struct StatusOutput {
    #[serde(flatten)]
    stats: SeenStats,
    tracked_sources: usize,
    total_sources: usize,
}

/// Show delivery statistics.
pub async fn cmd_status(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;
    let stats = load_stats(&ctx.seen()).await?;
    let sources = ctx.tracking().list().await?;
    let tracked = sources.iter().filter(|s| s.enabled).count();

    if json {
        let output = StatusOutput {
            stats,
            tracked_sources: tracked,
            total_sources: sources.len(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\n{}", style("noticewatch status").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Seen announcements:", stats.total_seen);
    println!("{:<20} {}", "Last 24 hours:", stats.last_24h);
    println!(
        "{:<20} {}",
        "Last check:",
        stats.last_check.as_deref().unwrap_or("never")
    );
    println!("{:<20} {} min", "Check interval:", stats.check_interval);
    println!("{:<20} {}/{}", "Tracked sources:", tracked, sources.len());

    Ok(())
}

/// Delete seen entries older than the retention window.
pub async fn cmd_purge(settings: &Settings, days: Option<u32>) -> anyhow::Result<()> {
    let days = days.unwrap_or(settings.retention_days);
    let ctx = open_database(settings).await?;

    let removed = ctx
        .seen()
        .purge_older_than(Duration::days(i64::from(days)))
        .await?;

    println!(
        "{} Removed {} entries older than {} days",
        style("✓").green(),
        removed,
        days
    );
    Ok(())
}

/// Set the configured check interval.
pub async fn cmd_interval(settings: &Settings, minutes: i64) -> anyhow::Result<()> {
    let minutes = validate_check_interval(minutes).map_err(anyhow::Error::msg)?;
    let ctx = open_database(settings).await?;

    ctx.seen()
        .set_status(STATUS_CHECK_INTERVAL, &minutes.to_string())
        .await?;

    println!(
        "{} Check interval set to {} minutes",
        style("✓").green(),
        minutes
    );
    println!("  The scheduler reads this value; update its cron entry to match");
    Ok(())
}
