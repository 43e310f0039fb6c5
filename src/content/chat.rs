//! Chat history codec — a chat file's content is a JSON array of messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Wire name of the role, as sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One message in a chat file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Specialist label attributed to a model reply, when one was announced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialist: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A user-authored message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            specialist: None,
            timestamp: Utc::now(),
        }
    }

    /// A model-authored message stamped with the current time.
    pub fn model(text: impl Into<String>, specialist: Option<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            specialist,
            timestamp: Utc::now(),
        }
    }
}

/// Parse a chat file's content into its ordered message list.
///
/// Blank content is an empty history, not an error; a fresh chat renders an
/// idle placeholder from it.
pub fn parse(content: &str) -> Result<Vec<ChatMessage>, WorkspaceError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(content).map_err(|e| WorkspaceError::MalformedContent {
        kind: "chat",
        reason: e.to_string(),
    })
}

/// Serialize the full message list back into file content.
pub fn serialize(messages: &[ChatMessage]) -> String {
    // Message fields are all serializable; this cannot fail.
    serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string())
}
