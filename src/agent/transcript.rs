//! Append-only conversation history for one run.

use crate::llm::{ChatMessage, Role};

/// Ordered messages replayed verbatim to the oracle every turn.
/// Messages can only be appended.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Messages with the given role, in order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(move |m| m.role == role)
    }
}
