use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of the participant that authored a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human end-user. User turns count against the session quota.
    User,
    /// The AI assistant.
    Assistant,
}

/// A single turn within a conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Monotonically non-decreasing ordering id, allocated by the session
    /// store from an atomic counter. An ordering hint, not a global key.
    pub sequence_id: u64,
    /// The role of the message author.
    pub role: Role,
    /// The textual content of the message.
    pub text: String,
    /// UTC timestamp of when the message was accepted into the session.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message with the given sequence id, role, and text.
    pub fn new(
        sequence_id: u64,
        role: Role,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence_id,
            role,
            text: text.into(),
            timestamp,
        }
    }

    /// Returns true if this is a user turn.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::new(7, Role::User, "Hello", Utc::now());
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text, "Hello");
        assert_eq!(msg.sequence_id, 7);
        assert!(msg.is_user());
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::new(1, Role::Assistant, "test", Utc::now());
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.text, "test");
        assert_eq!(deserialized.role, Role::Assistant);
        assert!(!deserialized.is_user());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, "\"user\"");
    }
}
