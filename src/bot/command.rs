//! Parsing of incoming chat messages into bot commands.

use crate::config::Messages;

/// A user request recognized by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`
    Start,
    /// `/trends` or the trends button
    Trends,
    /// `/rewrite <text>` or the copywriter button
    Rewrite(Option<String>),
    /// `/competitor <handle>` or the competitors button
    Competitor(Option<String>),
    /// `/notify` or the notifications button
    Notify,
    Unknown,
}

impl Command {
    /// Parse a message text.
    ///
    /// Menu buttons are matched against the labels in `messages`. Commands
    /// may carry a bot mention, as in `/start@my_bot`.
    pub fn parse(text: &str, messages: &Messages) -> Self {
        let text = text.trim();

        if text == messages.button_trends {
            return Self::Trends;
        }
        if text == messages.button_copywriter {
            return Self::Rewrite(None);
        }
        if text == messages.button_competitors {
            return Self::Competitor(None);
        }
        if text == messages.button_notifications {
            return Self::Notify;
        }

        let Some(body) = text.strip_prefix('/') else {
            return Self::Unknown;
        };

        let (head, rest) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], body[idx..].trim()),
            None => (body, ""),
        };
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        match name.as_str() {
            "start" | "help" => Self::Start,
            "trends" => Self::Trends,
            "rewrite" => Self::Rewrite(arg),
            "competitor" => Self::Competitor(arg),
            "notify" => Self::Notify,
            _ => Self::Unknown,
        }
    }
}
