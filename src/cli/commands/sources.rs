//! Source tracking commands.

use console::style;

use crate::config::Settings;

use super::helpers::{open_database, truncate};

/// List sources with their tracking state.
pub async fn cmd_sources_list(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;
    let sources = ctx.tracking().list().await?;

    if sources.is_empty() {
        println!("{} No sources configured", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Sources").bold());
    println!("{}", "-".repeat(72));
    println!("{:>3}  {:<4} {:<22} {:<38} Kind", "#", "", "ID", "Name");
    println!("{}", "-".repeat(72));

    for source in sources {
        let mark = if source.enabled {
            style("on").green()
        } else {
            style("off").dim()
        };
        println!(
            "{:>3}  {:<4} {:<22} {:<38} {}",
            source.position,
            mark,
            truncate(&source.id, 22),
            truncate(&source.name, 38),
            source.kind.as_str()
        );
    }

    Ok(())
}

/// Track or stop tracking the source at `position`.
pub async fn cmd_sources_set(
    settings: &Settings,
    position: i32,
    enabled: bool,
) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;
    let tracking = ctx.tracking();

    match tracking.set_enabled(position, enabled).await? {
        Some(source) => {
            let verb = if enabled { "Tracking" } else { "Stopped tracking" };
            println!("{} {} {}", style("✓").green(), verb, source.name);
            Ok(())
        }
        None => {
            let count = tracking.list().await?.len();
            anyhow::bail!("No source at position {} (valid: 1-{})", position, count)
        }
    }
}

/// Track or stop tracking every source.
pub async fn cmd_sources_set_all(settings: &Settings, enabled: bool) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;
    let count = ctx.tracking().set_all(enabled).await?;

    if enabled {
        println!("{} Tracking all {} sources", style("✓").green(), count);
    } else {
        println!("{} Stopped tracking {} sources", style("✓").green(), count);
    }
    Ok(())
}
