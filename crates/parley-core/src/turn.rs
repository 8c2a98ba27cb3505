use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human end-user.
    User,
    /// The persona-driven assistant.
    Assistant,
}

/// A single utterance within a conversation's history.
///
/// Turns are immutable once appended to a session; insertion order is
/// conversational order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored the utterance.
    pub role: Role,
    /// The utterance text. Never empty.
    pub text: String,
    /// UTC timestamp of when the turn was appended.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a new turn with the given role and text.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a new turn with [`Role::User`].
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Creates a new turn with [`Role::Assistant`].
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}
