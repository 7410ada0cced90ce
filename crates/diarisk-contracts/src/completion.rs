//! Completion service request and response types.
//!
//! These are provider-neutral. Adapters translate them to and from the wire
//! format of a concrete chat-completion API.

use serde::{Deserialize, Serialize};

/// Who a chat message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single request to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The conversation, in order. The risk query sends a system message
    /// followed by one user message.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature. Kept low to favor deterministic structured output.
    pub temperature: f64,
    /// Ask the service to constrain its reply to a single JSON object, where
    /// the provider supports it. Nothing downstream relies on this being honored.
    pub json_mode: bool,
}

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionChoice {
    /// The message text. Providers may omit it (e.g. refusals, tool calls).
    pub content: Option<String>,
}

/// The service's reply: zero or more candidate completions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Convenience constructor for a response with a single text choice.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice {
                content: Some(text.into()),
            }],
        }
    }

    /// The first choice's text, if it is present and not blank.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}
