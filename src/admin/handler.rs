//! Executes bot commands against the local database.

use std::time::Duration;

use tracing::{info, warn};

use super::command::AdminCommand;
use super::dispatch::WorkflowTrigger;
use super::AdminError;
use crate::config::Settings;
use crate::models::{validate_check_interval, SourceDescriptor, STATUS_CHECK_INTERVAL};
use crate::notify::{escape_html, format_status};
use crate::pipeline::{load_stats, SeenStore};
use crate::repository::DbContext;

const HELP_TEXT: &str = "🤖 <b>Announcement Bot</b>\n\n\
    Commands:\n\
    /list - Tracked sources\n\
    /follow &lt;no&gt; - Track a source\n\
    /unfollow &lt;no&gt; - Stop tracking a source\n\
    /followall - Track every source\n\
    /unfollowall - Stop tracking everything\n\
    /setinterval &lt;minutes&gt; - Set the check interval\n\
    /check - Run a check now\n\
    /status - Bot status\n\
    /help - This message";

const REFUSAL: &str = "⛔ This command is for the administrator only.";

/// Answers bot commands. Replies are Telegram HTML.
#[derive(Clone)]
pub struct AdminHandler {
    ctx: DbContext,
    admin_id: Option<String>,
    trigger: WorkflowTrigger,
}

impl AdminHandler {
    pub fn new(ctx: DbContext, admin_id: Option<String>, trigger: WorkflowTrigger) -> Self {
        Self {
            ctx,
            admin_id: admin_id.filter(|id| !id.is_empty()),
            trigger,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.create_db_context(),
            settings.telegram.admin_chat().map(str::to_string),
            WorkflowTrigger::new(
                settings.github.clone(),
                Duration::from_secs(settings.request_timeout),
            ),
        )
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_id.as_deref() == Some(user_id)
    }

    /// Handle one message from `user_id`. Returns the reply, or `None` when
    /// the text is not a command.
    pub async fn handle(&self, user_id: &str, text: &str) -> Option<String> {
        let command = AdminCommand::parse(text)?;

        if command.requires_admin() && !self.is_admin(user_id) {
            info!("Refused {:?} from non-admin {}", command, user_id);
            return Some(REFUSAL.to_string());
        }

        match self.execute(command).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!("Admin command failed: {}", e);
                Some(format!("❌ Command failed: {}", escape_html(&e.to_string())))
            }
        }
    }

    async fn execute(&self, command: AdminCommand) -> Result<String, AdminError> {
        match command {
            AdminCommand::Start | AdminCommand::Help => Ok(HELP_TEXT.to_string()),
            AdminCommand::Status => self.status().await,
            AdminCommand::List => self.list().await,
            AdminCommand::Follow(arg) => self.set_one(arg.as_deref(), true).await,
            AdminCommand::Unfollow(arg) => self.set_one(arg.as_deref(), false).await,
            AdminCommand::FollowAll => {
                let count = self.ctx.tracking().set_all(true).await?;
                Ok(format!("✅ Tracking all {} sources.", count))
            }
            AdminCommand::UnfollowAll => {
                self.ctx.tracking().set_all(false).await?;
                Ok("❌ Stopped tracking every source.".to_string())
            }
            AdminCommand::SetInterval(arg) => self.set_interval(arg.as_deref()).await,
            AdminCommand::Check => match self.trigger.trigger().await {
                Ok(()) => Ok("🔄 Check started. New announcements will arrive shortly.".to_string()),
                Err(AdminError::DispatchNotConfigured) => {
                    Ok("❌ Manual checks need GITHUB_TOKEN and GITHUB_REPO.".to_string())
                }
                Err(e) => Err(e),
            },
            AdminCommand::Unknown(name) => Ok(format!(
                "Unknown command {}. Send /help for the list.",
                escape_html(&name)
            )),
        }
    }

    async fn status(&self) -> Result<String, AdminError> {
        let stats = load_stats(&self.ctx.seen()).await?;
        let sources = self.ctx.tracking().list().await?;
        let tracked = sources.iter().filter(|s| s.enabled).count();
        Ok(format_status(&stats, tracked, sources.len()))
    }

    async fn list(&self) -> Result<String, AdminError> {
        let sources = self.ctx.tracking().list().await?;
        if sources.is_empty() {
            return Ok("No sources configured.".to_string());
        }

        let mut lines = vec!["📋 <b>Sources</b>".to_string(), String::new()];
        lines.extend(sources.iter().map(list_line));
        lines.push(String::new());
        lines.push("<i>/follow 5</i> tracks source number 5".to_string());
        Ok(lines.join("\n"))
    }

    async fn set_one(&self, arg: Option<&str>, enabled: bool) -> Result<String, AdminError> {
        let usage = if enabled {
            "Usage: /follow &lt;no&gt;"
        } else {
            "Usage: /unfollow &lt;no&gt;"
        };
        let Some(position) = arg.and_then(|a| a.parse::<i32>().ok()) else {
            return Ok(format!("❌ {}", usage));
        };

        let tracking = self.ctx.tracking();
        match tracking.set_enabled(position, enabled).await? {
            Some(source) if enabled => {
                Ok(format!("✅ Now tracking <b>{}</b>.", escape_html(&source.name)))
            }
            Some(source) => Ok(format!(
                "❌ Stopped tracking <b>{}</b>.",
                escape_html(&source.name)
            )),
            None => {
                let count = tracking.list().await?.len();
                Ok(format!("❌ Invalid number (1-{}).", count))
            }
        }
    }

    async fn set_interval(&self, arg: Option<&str>) -> Result<String, AdminError> {
        let Some(minutes) = arg.and_then(|a| a.parse::<i64>().ok()) else {
            return Ok("Usage: /setinterval &lt;minutes&gt;\nExample: /setinterval 10".to_string());
        };

        match validate_check_interval(minutes) {
            Ok(minutes) => {
                self.ctx
                    .seen()
                    .set_status(STATUS_CHECK_INTERVAL, &minutes.to_string())
                    .await?;
                Ok(format!("✅ Check interval set to {} minutes.", minutes))
            }
            Err(reason) => Ok(format!("❌ {}.", reason)),
        }
    }
}

fn list_line(source: &SourceDescriptor) -> String {
    let mark = if source.enabled { "✅" } else { "❌" };
    format!(
        "{} <b>{}</b> - {}",
        mark,
        source.position,
        escape_html(&source.name)
    )
}
