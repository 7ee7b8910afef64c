//! Agent module - the research control loop.
//!
//! The agent follows a JSON-controller "tools in a loop" pattern:
//! 1. Seed the transcript with the question and the planning instructions
//! 2. Ask the oracle for a decision (call tools or write the report)
//! 3. Execute requested tools in order and feed one observations message back
//! 4. Repeat until the oracle writes a report or the step budget runs out

mod agent_loop;
mod decision;
mod human;
mod observation;
mod prompt;
mod transcript;

#[cfg(test)]
pub(crate) mod test_utils;

pub use agent_loop::{Agent, AgentError, RunOutput, RunStatus};
pub use decision::{Decision, DecisionClient, OracleDecision, ToolInvocation};
pub use human::{ConsoleLines, HumanInput, NonInteractive, StdinInput};
pub use observation::{Observation, ObservationError, TRUNCATION_MARKER};
pub use prompt::{build_system_prompt, CONTROLLER_INSTRUCTION, PLANNER_INSTRUCTION};
pub use transcript::Transcript;

/// Reserved tool name answered by the human operator instead of the registry.
pub const CLARIFY_TOOL: &str = "clarify_user";

/// Report used when the oracle finishes with an empty or blank report.
pub const EMPTY_REPORT_PLACEHOLDER: &str = "(no report returned)";

/// Final message when the step budget runs out without a report.
pub const STEP_BUDGET_EXHAUSTED: &str =
    "I wasn't able to complete the research within the allotted steps. Consider increasing --max-steps.";

/// Appended when a turn produced nothing actionable.
pub const CONTINUE_NUDGE: &str =
    "Continue your plan and call the next tool or finish with a report.";

/// Stands in for an empty clarification answer in the transcript.
pub const NO_ANSWER: &str = "(no answer provided)";
