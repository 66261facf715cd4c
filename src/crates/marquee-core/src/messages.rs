//! Conversation message model.
//!
//! A conversation is an ordered, append-only sequence of [`Message`]s. The
//! first entry is always the system instruction; later entries alternate
//! between user input, assistant replies, and injected function results.
//! History is never reordered or deduplicated — the model sees the exact
//! sequence on every invocation.

use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction seeded at session start.
    System,

    /// End-user input.
    User,

    /// Model-generated reply.
    Assistant,

    /// Result of an executed function call, injected for the model to read.
    Tool,
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender.
    pub role: MessageRole,

    /// Message text.
    pub content: String,
}

impl Message {
    /// Create a new message with the given role and content.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a function-result message.
    pub fn tool_result(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Tool, content)
    }

    /// True if this message carries a function result.
    pub fn is_tool_result(&self) -> bool {
        self.role == MessageRole::Tool
    }
}
