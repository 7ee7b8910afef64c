//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmError, Role};

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client; `timeout` bounds every request end to end.
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ApiResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ApiResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ApiChatResponse {
    id: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    content: Option<String>,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        // JSON-controller protocol: observations are read back as user turns.
        Role::Observation => "user",
    }
}

fn to_api_messages(messages: &[ChatMessage]) -> Vec<ApiMessage> {
    messages
        .iter()
        .map(|m| ApiMessage {
            role: wire_role(m.role),
            content: m.content.as_text(),
        })
        .collect()
}

fn parse_response(body: &[u8]) -> Result<ChatResponse, LlmError> {
    let parsed: ApiChatResponse = serde_json::from_slice(body)?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyChoices)?;
    Ok(ChatResponse {
        id: parsed.id,
        content: choice.message.content,
        finish_reason: choice.finish_reason,
    })
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let api_request = ApiChatRequest {
            model: &request.model,
            messages: to_api_messages(&request.messages),
            temperature: request.temperature,
            response_format: request
                .json_mode
                .then_some(ApiResponseFormat { kind: "json_object" }),
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Oracle request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(status = %status, body_len = bytes.len(), "Oracle response");

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        parse_response(&bytes)
    }
}
