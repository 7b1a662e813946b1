//! Chat messages exchanged with teams

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions supplied by the calling client
    System,
    /// Human turn
    User,
    /// Model turn
    Assistant,
}

impl Role {
    /// Parse the lowercase wire name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    /// Label used when rendering history into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(s)
    }
}

/// One chat message; ordered sequences of these form a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author
    pub role: Role,
    /// Text content
    pub content: String,
}

impl Message {
    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Content of the most recent user message, if any
pub fn last_user_message(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}

/// Render a conversation as `User:` / `Assistant:` lines in chronological
/// order. System messages are accepted from clients but never rendered.
pub fn render_history(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_is_lowercase() {
        let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(
            serde_json::to_string(&Message::user("yo")).unwrap(),
            r#"{"role":"user","content":"yo"}"#
        );
    }

    #[test]
    fn test_role_parse_matches_display() {
        for role in [Role::System, Role::User, Role::Assistant] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
        assert_eq!(Role::parse("User"), None);
        assert_eq!(Role::parse("tool"), None);
    }

    #[test]
    fn test_last_user_message_skips_assistant_turns() {
        let convo = vec![
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
            Message::assistant("another reply"),
        ];
        assert_eq!(last_user_message(&convo), Some("second"));
        assert_eq!(last_user_message(&[]), None);
    }

    #[test]
    fn test_render_history() {
        let convo = vec![Message::user("hello"), Message::assistant("hi there")];
        assert_eq!(render_history(&convo), "User: hello\nAssistant: hi there");
    }

    #[test]
    fn test_render_history_drops_system_messages() {
        let convo = vec![
            Message {
                role: Role::System,
                content: "be brief".into(),
            },
            Message::user("hello"),
            Message::assistant("hi there"),
        ];
        assert_eq!(render_history(&convo), "User: hello\nAssistant: hi there");
    }
}
