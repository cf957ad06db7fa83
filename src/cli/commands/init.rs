//! Initialize command.

use console::style;

use crate::config::Settings;

/// Initialize the data directory and database, and sync the source catalog.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let ctx = settings.create_db_context();
    let applied = ctx
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
    for name in &applied {
        println!("  {} Applied migration {}", style("✓").green(), name);
    }

    let summary = ctx.tracking().sync_catalog(&settings.catalog).await?;
    println!(
        "  {} {} sources ({} added, {} removed)",
        style("✓").green(),
        settings.catalog.len(),
        summary.added,
        summary.removed
    );

    if !settings.telegram.is_configured() {
        println!(
            "{} Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID before running 'noticewatch check'",
            style("!").yellow()
        );
    }

    println!(
        "{} Initialized noticewatch in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!("  Run 'noticewatch seed' once to skip announcements already online");

    Ok(())
}
