use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{ChatRequest, ChatResponse, LlmClient, LlmError};
use crate::tools::Tool;

use super::human::HumanInput;

// ===================
// Mock oracle
// ===================

enum Reply {
    Text(String),
    Status(u16),
}

/// Oracle that replays queued replies, then the fallback (if any).
pub struct MockLlm {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlm {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Reply::Text(r.to_string())).collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every turn with `reply`.
    pub fn repeating(reply: &str) -> Self {
        Self {
            fallback: Some(Reply::Text(reply.to_string())),
            ..Self::new(vec![])
        }
    }

    /// Fails every turn with an HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            fallback: Some(Reply::Status(status)),
            ..Self::new(vec![])
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let turn = self.requests.lock().unwrap().len();
        self.requests.lock().unwrap().push(request);

        let queued = self.replies.lock().unwrap().pop_front();
        let content = match queued.as_ref().or(self.fallback.as_ref()) {
            Some(Reply::Text(text)) => text.clone(),
            Some(Reply::Status(status)) => {
                return Err(LlmError::Status {
                    status: *status,
                    body: "mock failure".to_string(),
                })
            }
            None => panic!("MockLlm ran out of replies"),
        };

        Ok(ChatResponse {
            id: Some(format!("mock-{}", turn)),
            content: Some(content),
            finish_reason: Some("stop".to_string()),
        })
    }
}

// ===================
// Mock tool
// ===================

/// Tool with a fixed outcome that counts its invocations.
pub struct CountingTool {
    name: String,
    outcome: Result<Value, String>,
    calls: Arc<AtomicUsize>,
}

impl CountingTool {
    pub fn ok(name: &str, result: Value) -> Self {
        Self {
            name: name.to_string(),
            outcome: Ok(result),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str, error: &str) -> Self {
        Self {
            outcome: Err(error.to_string()),
            ..Self::ok(name, Value::Null)
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Test tool."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

// ===================
// Scripted operator
// ===================

/// Answers from a script; an exhausted script answers empty.
pub struct ScriptedInput {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedInput {
    pub fn new(answers: Vec<&str>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(String::from).collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl HumanInput for ScriptedInput {
    async fn ask(&self, question: &str) -> String {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or_default()
    }
}
