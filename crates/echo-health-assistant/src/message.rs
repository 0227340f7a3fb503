//! Chat messages and transcript seeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prompts::{SYSTEM_PROMPT, WELCOME_MESSAGE};

/// Author of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// System prompt followed by the welcome message.
pub fn seed_transcript() -> Vec<Message> {
    vec![Message::system(SYSTEM_PROMPT), Message::assistant(WELCOME_MESSAGE)]
}

/// Put a system prompt back at position 0 if it is missing there.
/// Returns whether the transcript was repaired.
pub fn ensure_system_prompt(messages: &mut Vec<Message>) -> bool {
    match messages.first() {
        Some(first) if first.role == Role::System => false,
        _ => {
            messages.insert(0, Message::system(SYSTEM_PROMPT));
            true
        }
    }
}
