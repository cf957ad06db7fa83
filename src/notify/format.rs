//! Telegram HTML message templates.

use crate::models::{Announcement, SeenStats};
use crate::scrapers::extract::truncate_chars;

/// Limits applied when rendering an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimits {
    /// Body characters shown before the text is cut with an ellipsis.
    pub body_chars: usize,
    /// Attachments listed per message.
    pub max_attachments: usize,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            body_chars: 500,
            max_attachments: 5,
        }
    }
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a value placed inside a double-quoted attribute.
fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

pub fn format_announcement(announcement: &Announcement, limits: &MessageLimits) -> String {
    let mut parts = vec![
        "📢 <b>NEW ANNOUNCEMENT</b>".to_string(),
        String::new(),
        format!("👤 <b>{}</b>", escape_html(&announcement.source_name)),
        format!("📅 {}", escape_html(&announcement.published_date)),
        String::new(),
        format!("📝 <b>{}</b>", escape_html(&announcement.title)),
    ];

    if !announcement.body.is_empty() {
        let mut body = truncate_chars(&announcement.body, limits.body_chars);
        if body.len() < announcement.body.len() {
            body.push_str("...");
        }
        parts.push(String::new());
        parts.push(escape_html(&body));
    }

    if !announcement.attachments.is_empty() {
        parts.push(String::new());
        parts.push("📎 <b>Attachments:</b>".to_string());
        for file in announcement.attachments.iter().take(limits.max_attachments) {
            let name = if file.name.is_empty() {
                "File"
            } else {
                file.name.as_str()
            };
            if file.url.is_empty() {
                parts.push(format!("• {}", escape_html(name)));
            } else {
                parts.push(format!(
                    "• <a href=\"{}\">{}</a>",
                    escape_attr(&file.url),
                    escape_html(name)
                ));
            }
        }
    }

    parts.push(String::new());
    parts.push(format!(
        "🔗 <a href=\"{}\">Open source page</a>",
        escape_attr(&announcement.origin_url)
    ));

    parts.join("\n")
}

pub fn format_status(stats: &SeenStats, tracked: usize, total_sources: usize) -> String {
    format!(
        "📊 <b>Status</b>\n\n\
         🔢 Announcements seen: {}\n\
         📅 Last 24 hours: {}\n\
         ⏰ Last check: {}\n\
         ⏱ Check interval: {} min\n\
         👥 Tracked sources: {}/{}",
        stats.total_seen,
        stats.last_24h,
        escape_html(stats.last_check.as_deref().unwrap_or("never")),
        stats.check_interval,
        tracked,
        total_sources,
    )
}

pub fn format_error(message: &str) -> String {
    format!(
        "⚠️ <b>Check failed</b>\n\n{}\n\nPlease check the logs.",
        escape_html(message)
    )
}
