//! Check and seed commands.

use std::time::Duration;

use console::style;

use crate::config::Settings;
use crate::notify::TelegramClient;
use crate::pipeline::RunOrchestrator;
use crate::scrapers::PageExtractor;

use super::helpers::{open_database, open_or_notify, warn_if_unconfigured};

/// Run one check over every tracked source.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    warn_if_unconfigured(settings);
    let telegram = TelegramClient::from_settings(settings);
    let ctx = open_or_notify(settings, &telegram).await?;

    let tracking = ctx.tracking();
    let store = ctx.seen();
    let extractor = PageExtractor::with_settings(
        Duration::from_secs(settings.request_timeout),
        settings.user_agent.as_deref(),
    );

    let orchestrator = RunOrchestrator::new(&tracking, &extractor, &store, &telegram);
    let report = orchestrator.run_or_notify().await?;

    println!(
        "{} Checked {} sources: {} announcements, {} new",
        style("✓").green(),
        report.sources_checked,
        report.extracted,
        report.new
    );
    if report.attempted > 0 {
        println!(
            "  Delivered {}/{} ({} duplicates skipped)",
            report.delivered, report.attempted, report.duplicates
        );
    }
    if report.failed_deliveries > 0 {
        println!(
            "  {} {} deliveries failed and will be retried next run",
            style("!").yellow(),
            report.failed_deliveries
        );
    }
    for source in &report.failed_sources {
        println!("  {} Could not read source {}", style("✗").red(), source);
    }

    Ok(())
}

/// Record every currently published announcement without delivering.
pub async fn cmd_seed(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;

    let tracking = ctx.tracking();
    let store = ctx.seen();
    let extractor = PageExtractor::with_settings(
        Duration::from_secs(settings.request_timeout),
        settings.user_agent.as_deref(),
    );
    let telegram = TelegramClient::from_settings(settings);

    let orchestrator = RunOrchestrator::new(&tracking, &extractor, &store, &telegram);
    let report = orchestrator.seed().await?;

    println!(
        "{} Marked {} announcements as seen ({} already known) across {} sources",
        style("✓").green(),
        report.recorded,
        report.already_seen,
        report.sources_checked
    );
    for source in &report.failed_sources {
        println!("  {} Could not read source {}", style("✗").red(), source);
    }

    Ok(())
}
