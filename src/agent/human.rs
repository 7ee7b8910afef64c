//! Human clarification capability.
//!
//! The agent loop asks the operator through [`HumanInput`]; an answer that
//! cannot be read (closed stdin, non-interactive deployment) is an empty string.

use std::io::{BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

#[async_trait]
pub trait HumanInput: Send + Sync {
    async fn ask(&self, question: &str) -> String;
}

/// Lines typed on the console, read by one background thread.
///
/// Every reader (REPL prompt, save prompt, clarification) receives from the
/// same channel. A read dropped while waiting leaves the next line queued.
pub struct ConsoleLines {
    lines: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ConsoleLines {
    /// Start the stdin reader thread.
    pub fn spawn() -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            tracing::debug!("stdin closed");
        });
        Arc::new(Self::from_channel(rx))
    }

    pub fn from_channel(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            lines: Mutex::new(rx),
        }
    }

    /// Print `prompt` and wait for the next line. `None` once input is closed.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{}", prompt);
        let _ = stdout.flush();

        self.lines.lock().await.recv().await
    }
}

/// Prints the question and takes the next console line as the answer.
pub struct StdinInput {
    console: Arc<ConsoleLines>,
}

impl StdinInput {
    pub fn new(console: Arc<ConsoleLines>) -> Self {
        Self { console }
    }
}

#[async_trait]
impl HumanInput for StdinInput {
    async fn ask(&self, question: &str) -> String {
        let prompt = format!("\nAgent needs clarification: {}\n[you] ", question);
        self.console
            .read_line(&prompt)
            .await
            .map(|line| line.trim().to_string())
            .unwrap_or_default()
    }
}

/// Answers every question with an empty string, immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

#[async_trait]
impl HumanInput for NonInteractive {
    async fn ask(&self, question: &str) -> String {
        tracing::debug!(question = %question, "Clarification skipped (non-interactive)");
        String::new()
    }
}
