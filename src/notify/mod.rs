//! Outbound notifications.

pub mod format;
pub mod telegram;

pub use format::{escape_html, format_announcement, format_error, format_status, MessageLimits};
pub use telegram::TelegramClient;

use async_trait::async_trait;

use crate::models::Announcement;

/// Where announcements are delivered.
///
/// Ordinary delivery failures are reported as `false`, never as errors.
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    /// Deliver one announcement. True only if the receiver confirmed it.
    async fn send(&self, announcement: &Announcement) -> bool;

    /// Best-effort operator alert for a run-level failure.
    async fn notify_error(&self, message: &str) -> bool;
}
