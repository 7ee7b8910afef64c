//! Oracle boundary: chat messages and the completion client trait.

mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use openai::OpenAiClient;

/// Who a transcript message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Tool results fed back to the oracle.
    Observation,
}

/// Message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Json(Value),
}

impl Content {
    /// Render as the string sent over the wire.
    pub fn as_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Json(value) => value.to_string(),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Content::Json(value) => Some(value),
            Content::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Content,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(text.into()),
        }
    }

    pub fn assistant_json(value: Value) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Json(value),
        }
    }

    pub fn observation(value: Value) -> Self {
        Self {
            role: Role::Observation,
            content: Content::Json(value),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// Ask the oracle for a JSON object response.
    pub json_mode: bool,
}

/// The first choice of a completion.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub id: Option<String>,
    pub content: Option<String>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("oracle response contained no choices")]
    EmptyChoices,
}

/// A chat-completion oracle.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_content_renders_compactly() {
        let content = Content::Json(json!({"observations": []}));
        assert_eq!(content.as_text(), r#"{"observations":[]}"#);
        assert!(content.as_json().is_some());
        assert_eq!(Content::Text("hi".into()).as_text(), "hi");
    }
}
