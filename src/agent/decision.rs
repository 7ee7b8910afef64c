//! Decision client: turns the oracle's free-form controller JSON into a
//! [`Decision`].
//!
//! The oracle is asked for a JSON object of the form
//!
//! ```json
//! {"action": "call", "reasoning": "...", "calls": [{"tool": "get_pokemon", "args": {"name": "pikachu"}}]}
//! {"action": "write", "report": "...", "confidence": 0.8}
//! ```
//!
//! but it drifts between field names and occasionally returns something that
//! is not JSON at all. Normalization never fails: whatever comes back maps to
//! exactly one decision.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::transcript::Transcript;
use crate::llm::{ChatRequest, LlmClient, LlmError};

const TOOL_KEYS: [&str; 3] = ["tool", "name", "recipient_name"];
const ARGS_KEYS: [&str; 3] = ["args", "arguments", "parameters"];
const RATIONALE_KEYS: [&str; 3] = ["reasoning", "why", "rationale"];

/// One requested tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub args: Value,
}

impl ToolInvocation {
    pub fn new(tool: impl Into<String>, args: Value) -> Self {
        Self {
            tool: tool.into(),
            args,
        }
    }
}

/// What the oracle wants to do this turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Run these tools (possibly none) and report back.
    Call {
        calls: Vec<ToolInvocation>,
        rationale: Option<String>,
    },
    /// Finish with this report.
    Write {
        report: String,
        confidence: Option<f64>,
    },
    /// Valid JSON without a recognised `action`.
    Unknown { content: String },
}

impl Decision {
    /// Normalize the raw oracle text.
    ///
    /// Returns the decision together with the controller object it was read
    /// from. Text that is not a JSON object becomes a zero-confidence `Write`
    /// whose report is the text itself, unchanged.
    pub fn from_controller_text(raw: &str) -> (Decision, Value) {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(obj)) => {
                let decision = Self::from_controller(&obj);
                (decision, Value::Object(obj))
            }
            _ => {
                let decision = Decision::Write {
                    report: raw.to_string(),
                    confidence: Some(0.0),
                };
                let controller = json!({"action": "write", "report": raw, "confidence": 0.0});
                (decision, controller)
            }
        }
    }

    fn from_controller(obj: &Map<String, Value>) -> Decision {
        let action = obj
            .get("action")
            .and_then(Value::as_str)
            .map(|a| a.trim().to_lowercase())
            .unwrap_or_default();

        match action.as_str() {
            "call" => {
                let calls = obj
                    .get("calls")
                    .and_then(Value::as_array)
                    .map(|calls| calls.iter().filter_map(normalize_call).collect())
                    .unwrap_or_default();
                Decision::Call {
                    calls,
                    rationale: first_text(obj, &RATIONALE_KEYS),
                }
            }
            "write" => Decision::Write {
                report: text_field(obj, "report"),
                confidence: obj
                    .get("confidence")
                    .and_then(Value::as_f64)
                    .map(|c| c.clamp(0.0, 1.0)),
            },
            _ => {
                let content = first_text(obj, &["report", "reasoning"]).unwrap_or_default();
                Decision::Unknown { content }
            }
        }
    }

    /// Lowercase kind name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Call { .. } => "call",
            Decision::Write { .. } => "write",
            Decision::Unknown { .. } => "unknown",
        }
    }
}

/// Map one `calls[]` entry to an invocation; `None` if it names no tool.
fn normalize_call(entry: &Value) -> Option<ToolInvocation> {
    let obj = entry.as_object()?;

    let tool = TOOL_KEYS
        .iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|t| !t.is_empty())?;

    let args = ARGS_KEYS
        .iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| is_present(v))
        .map(normalize_args)
        .unwrap_or_else(|| json!({}));

    Some(ToolInvocation::new(tool, args))
}

/// Arguments must be an object; a JSON-encoded string is decoded first.
fn normalize_args(value: &Value) -> Value {
    match value {
        Value::Object(_) => value.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(decoded @ Value::Object(_)) => decoded,
            _ => json!({}),
        },
        _ => json!({}),
    }
}

/// Null, false, zero and empty strings/arrays/objects count as absent, so a
/// later alternate key can still supply the value.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .map(|k| text_field(obj, k))
        .find(|s| !s.is_empty())
}

/// A decision plus what came with it.
#[derive(Debug, Clone)]
pub struct OracleDecision {
    pub decision: Decision,
    /// The controller object the decision was read from.
    pub raw: Value,
    pub stop_reason: Option<String>,
    pub response_id: Option<String>,
}

/// Asks the oracle for one decision per turn.
pub struct DecisionClient {
    llm: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
}

impl DecisionClient {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One oracle round trip. Transport and API failures propagate.
    pub async fn decide(&self, transcript: &Transcript) -> Result<OracleDecision, LlmError> {
        let response = self
            .llm
            .chat_completion(ChatRequest {
                model: self.model.clone(),
                messages: transcript.messages().to_vec(),
                temperature: self.temperature,
                json_mode: true,
            })
            .await?;

        // An empty completion reads as an empty controller object, not a report.
        let text = response
            .content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "{}".to_string());
        let (decision, raw) = Decision::from_controller_text(&text);

        Ok(OracleDecision {
            decision,
            raw,
            stop_reason: response.finish_reason,
            response_id: response.id,
        })
    }
}
