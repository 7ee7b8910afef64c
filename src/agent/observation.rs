//! Observation records: the outcome of one tool invocation, in the envelope
//! the oracle reads back.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use thiserror::Error;

pub const TRUNCATION_MARKER: &str = "… (truncated)";

#[derive(Debug, Error, PartialEq)]
pub enum ObservationError {
    #[error("observation for '{tool}' (step {step}) is already finished")]
    AlreadyFinished { tool: String, step: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Pending,
    Ok(Value),
    Err(String),
}

/// One tool invocation and its outcome.
///
/// Created when the call is dispatched and finished exactly once. The first
/// `finish` wins; a second one is rejected and leaves the record unchanged.
#[derive(Debug, Clone)]
pub struct Observation {
    pub tool: String,
    pub args: Value,
    pub step: usize,
    outcome: Outcome,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    started: Instant,
    elapsed: Option<Duration>,
}

impl Observation {
    pub fn start(tool: impl Into<String>, args: Value, step: usize) -> Self {
        Self {
            tool: tool.into(),
            args,
            step,
            outcome: Outcome::Pending,
            started_at: Utc::now(),
            ended_at: None,
            started: Instant::now(),
            elapsed: None,
        }
    }

    /// Record the result or the error message.
    pub fn finish(&mut self, outcome: Result<Value, String>) -> Result<(), ObservationError> {
        if self.is_finished() {
            return Err(ObservationError::AlreadyFinished {
                tool: self.tool.clone(),
                step: self.step,
            });
        }
        self.outcome = match outcome {
            Ok(value) => Outcome::Ok(value),
            Err(message) => Outcome::Err(message),
        };
        self.ended_at = Some(Utc::now());
        self.elapsed = Some(self.started.elapsed());
        Ok(())
    }

    pub fn success(tool: impl Into<String>, args: Value, result: Value, step: usize) -> Self {
        let mut obs = Self::start(tool, args, step);
        obs.outcome = Outcome::Ok(result);
        obs.ended_at = Some(Utc::now());
        obs.elapsed = Some(obs.started.elapsed());
        obs
    }

    pub fn failure(tool: impl Into<String>, args: Value, error: impl Into<String>, step: usize) -> Self {
        let mut obs = Self::start(tool, args, step);
        obs.outcome = Outcome::Err(error.into());
        obs.ended_at = Some(Utc::now());
        obs.elapsed = Some(obs.started.elapsed());
        obs
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.outcome, Outcome::Pending)
    }

    /// True unless an error was recorded.
    pub fn ok(&self) -> bool {
        !matches!(self.outcome, Outcome::Err(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Err(message) => Some(message),
            _ => None,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// `None` until finished.
    pub fn duration(&self) -> Option<Duration> {
        self.elapsed
    }

    /// `{"tool", "args", "result"}`; a failed call carries `{"error": msg}` as its result.
    pub fn to_message_payload(&self) -> Value {
        let result = match &self.outcome {
            Outcome::Ok(value) => value.clone(),
            Outcome::Err(message) => json!({ "error": message }),
            Outcome::Pending => Value::Null,
        };
        json!({
            "tool": self.tool,
            "args": self.args,
            "result": result,
        })
    }

    /// The message payload, cut down when its compact JSON exceeds `max_chars`.
    ///
    /// String results keep their first `max_chars / 2` characters plus a
    /// marker, objects collapse to `{"_truncated": true}`, anything else
    /// becomes the string `"(truncated)"`.
    pub fn bounded_payload(&self, max_chars: usize) -> Value {
        let mut payload = self.to_message_payload();
        if payload.to_string().chars().count() <= max_chars {
            return payload;
        }

        let truncated = match &payload["result"] {
            Value::String(s) => {
                let head: String = s.chars().take(max_chars / 2).collect();
                Value::String(format!("{}{}", head, TRUNCATION_MARKER))
            }
            Value::Object(_) => json!({ "_truncated": true }),
            _ => Value::String("(truncated)".to_string()),
        };
        payload["result"] = truncated;
        payload
    }
}
