//! Bot command parsing.

/// A chat command addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Start,
    Help,
    Status,
    List,
    /// Raw position argument, if any.
    Follow(Option<String>),
    Unfollow(Option<String>),
    FollowAll,
    UnfollowAll,
    /// Raw minutes argument, if any.
    SetInterval(Option<String>),
    Check,
    Unknown(String),
}

impl AdminCommand {
    /// Parse a message text. Returns `None` for anything that is not a command.
    ///
    /// The command word is lowercased and a trailing `@botname` is dropped,
    /// so `/Follow@watch_bot 3` reads as `/follow 3`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text.split_whitespace();
        let head = parts.next()?.to_lowercase();
        let name = head.split('@').next().unwrap_or_default();
        let arg = parts.next().map(str::to_string);

        let command = match name {
            "/start" => Self::Start,
            "/help" => Self::Help,
            "/status" => Self::Status,
            "/list" => Self::List,
            "/follow" => Self::Follow(arg),
            "/unfollow" => Self::Unfollow(arg),
            "/followall" => Self::FollowAll,
            // Older clients were told about the misspelled form.
            "/unfollowall" | "/unfollowmall" => Self::UnfollowAll,
            "/setinterval" => Self::SetInterval(arg),
            "/check" => Self::Check,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }

    /// Whether only the administrator may run this command.
    pub fn requires_admin(&self) -> bool {
        !matches!(self, Self::Start | Self::Help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(AdminCommand::parse("/start"), Some(AdminCommand::Start));
        assert_eq!(AdminCommand::parse("/help"), Some(AdminCommand::Help));
        assert_eq!(AdminCommand::parse("/status"), Some(AdminCommand::Status));
        assert_eq!(AdminCommand::parse("/check"), Some(AdminCommand::Check));
    }

    #[test]
    fn test_parse_normalizes_case_and_bot_suffix() {
        assert_eq!(
            AdminCommand::parse("  /Follow@watch_bot 3 extra"),
            Some(AdminCommand::Follow(Some("3".to_string())))
        );
        assert_eq!(
            AdminCommand::parse("/LIST@watch_bot"),
            Some(AdminCommand::List)
        );
    }

    #[test]
    fn test_parse_missing_argument() {
        assert_eq!(
            AdminCommand::parse("/setinterval"),
            Some(AdminCommand::SetInterval(None))
        );
        assert_eq!(
            AdminCommand::parse("/unfollow"),
            Some(AdminCommand::Unfollow(None))
        );
    }

    #[test]
    fn test_parse_unfollow_all_spellings() {
        assert_eq!(
            AdminCommand::parse("/unfollowall"),
            Some(AdminCommand::UnfollowAll)
        );
        assert_eq!(
            AdminCommand::parse("/unfollowmall"),
            Some(AdminCommand::UnfollowAll)
        );
    }

    #[test]
    fn test_non_commands_are_ignored() {
        assert_eq!(AdminCommand::parse("hello"), None);
        assert_eq!(AdminCommand::parse(""), None);
        assert_eq!(
            AdminCommand::parse("/dance"),
            Some(AdminCommand::Unknown("/dance".to_string()))
        );
    }

    #[test]
    fn test_requires_admin() {
        assert!(!AdminCommand::Start.requires_admin());
        assert!(!AdminCommand::Help.requires_admin());
        assert!(AdminCommand::FollowAll.requires_admin());
        assert!(AdminCommand::Unknown("/x".into()).requires_admin());
    }
}
