//! Core agent loop implementation.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::tools::ToolRegistry;

use super::decision::{Decision, DecisionClient, ToolInvocation};
use super::human::HumanInput;
use super::observation::Observation;
use super::prompt::{build_system_prompt, CONTROLLER_INSTRUCTION, PLANNER_INSTRUCTION};
use super::transcript::Transcript;
use super::{
    CLARIFY_TOOL, CONTINUE_NUDGE, EMPTY_REPORT_PLACEHOLDER, NO_ANSWER, STEP_BUDGET_EXHAUSTED,
};

/// Control-plane failures; tool failures never surface here.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Oracle(#[from] LlmError),

    #[error("run cancelled")]
    Cancelled,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// The oracle wrote a report.
    Completed { confidence: Option<f64> },
    /// The step budget ran out first.
    Exhausted,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The final report, or the exhaustion advisory.
    pub report: String,
    pub status: RunStatus,
    /// Oracle round trips made.
    pub steps: usize,
    pub transcript: Transcript,
    /// Every observation of the run, in execution order.
    pub observations: Vec<Observation>,
}

/// What the loop does with a decision.
#[derive(Debug, PartialEq)]
enum Transition {
    Finalize {
        report: String,
        confidence: Option<f64>,
    },
    Call(Vec<ToolInvocation>),
    Continue,
}

impl Transition {
    fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Write { report, confidence } => {
                let report = report.trim();
                let report = if report.is_empty() {
                    EMPTY_REPORT_PLACEHOLDER.to_string()
                } else {
                    report.to_string()
                };
                Transition::Finalize { report, confidence }
            }
            Decision::Call { calls, .. } if !calls.is_empty() => Transition::Call(calls),
            Decision::Call { .. } | Decision::Unknown { .. } => Transition::Continue,
        }
    }
}

/// The research agent.
///
/// Holds only shared, immutable collaborators; every run owns its own
/// transcript and step counter, so one agent can serve queries back to back.
pub struct Agent {
    config: AgentConfig,
    decisions: DecisionClient,
    tools: ToolRegistry,
    human: Arc<dyn HumanInput>,
}

impl Agent {
    pub fn new(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        human: Arc<dyn HumanInput>,
    ) -> Self {
        let decisions = DecisionClient::new(llm, config.model.clone(), config.temperature);
        Self {
            config,
            decisions,
            tools,
            human,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer one question.
    pub async fn run(&self, query: &str) -> Result<RunOutput, AgentError> {
        self.run_with_cancel(query, &CancellationToken::new()).await
    }

    /// Answer one question, stopping early when `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutput, AgentError> {
        let span = tracing::info_span!("run", run_id = %Uuid::new_v4());
        self.run_loop(query, cancel).instrument(span).await
    }

    fn seed_transcript(&self, query: &str) -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user(query));
        transcript.push(ChatMessage::user(PLANNER_INSTRUCTION));
        transcript.push(ChatMessage::system(build_system_prompt(&self.tools)));
        transcript.push(ChatMessage::system(CONTROLLER_INSTRUCTION));
        transcript
    }

    async fn run_loop(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutput, AgentError> {
        let mut transcript = self.seed_transcript(query);
        let mut observations = Vec::new();

        tracing::info!(model = %self.decisions.model(), max_steps = self.config.max_steps, "Starting research run");

        for step in 1..=self.config.max_steps {
            if cancel.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            tracing::debug!("Step {} - calling oracle", step);

            let oracle = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                decided = self.decisions.decide(&transcript) => decided?,
            };

            tracing::debug!(
                step,
                kind = oracle.decision.kind(),
                stop_reason = oracle.stop_reason.as_deref().unwrap_or("-"),
                response_id = oracle.response_id.as_deref().unwrap_or("-"),
                "Oracle decision"
            );

            if let Decision::Call {
                rationale: Some(rationale),
                ..
            } = &oracle.decision
            {
                tracing::info!(step, "Controller: {}", rationale);
            }

            match Transition::from_decision(oracle.decision) {
                Transition::Finalize { report, confidence } => {
                    tracing::info!(step, confidence = ?confidence, "Report written");
                    return Ok(RunOutput {
                        report,
                        status: RunStatus::Completed { confidence },
                        steps: step,
                        transcript,
                        observations,
                    });
                }
                Transition::Call(calls) => {
                    self.echo_decision(&mut transcript, oracle.raw);
                    let step_observations = self
                        .handle_calls(step, calls, &mut transcript, cancel)
                        .await?;
                    let payloads: Vec<Value> = step_observations
                        .iter()
                        .map(|o| o.bounded_payload(self.config.observation_max_chars))
                        .collect();
                    transcript.push(ChatMessage::observation(json!({ "observations": payloads })));
                    observations.extend(step_observations);
                }
                Transition::Continue => {
                    tracing::warn!(step, "Decision had nothing to do, nudging the oracle");
                    self.echo_decision(&mut transcript, oracle.raw);
                    transcript.push(ChatMessage::user(CONTINUE_NUDGE));
                }
            }
        }

        tracing::warn!(max_steps = self.config.max_steps, "Step budget exhausted");
        Ok(RunOutput {
            report: STEP_BUDGET_EXHAUSTED.to_string(),
            status: RunStatus::Exhausted,
            steps: self.config.max_steps,
            transcript,
            observations,
        })
    }

    fn echo_decision(&self, transcript: &mut Transcript, raw: Value) {
        if self.config.echo_decisions {
            transcript.push(ChatMessage::assistant_json(raw));
        }
    }

    /// Run one step's calls strictly in request order.
    async fn handle_calls(
        &self,
        step: usize,
        calls: Vec<ToolInvocation>,
        transcript: &mut Transcript,
        cancel: &CancellationToken,
    ) -> Result<Vec<Observation>, AgentError> {
        let mut observations = Vec::with_capacity(calls.len());

        for call in calls {
            tracing::info!(step, tool = %call.tool, args = %call.args, "Tool call");

            let obs = if call.tool == CLARIFY_TOOL {
                let (obs, answer) = self.clarify(step, call, cancel).await?;
                let answer = if answer.is_empty() {
                    NO_ANSWER.to_string()
                } else {
                    answer
                };
                transcript.push(ChatMessage::user(answer));
                obs
            } else {
                self.invoke(step, call, cancel).await?
            };

            self.log_observation(&obs);
            observations.push(obs);
        }

        Ok(observations)
    }

    async fn clarify(
        &self,
        step: usize,
        call: ToolInvocation,
        cancel: &CancellationToken,
    ) -> Result<(Observation, String), AgentError> {
        let question = call.args["question"]
            .as_str()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or("Could you clarify your request?")
            .to_string();

        let mut obs = Observation::start(call.tool, call.args, step);
        let answer = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AgentError::Cancelled),
            answer = self.human.ask(&question) => answer,
        };
        let answer = answer.trim().to_string();
        finish(&mut obs, Ok(json!({ "user_answer": answer })));
        Ok((obs, answer))
    }

    async fn invoke(
        &self,
        step: usize,
        call: ToolInvocation,
        cancel: &CancellationToken,
    ) -> Result<Observation, AgentError> {
        let mut obs = Observation::start(&call.tool, call.args.clone(), step);

        let Some(tool) = self.tools.get(&call.tool) else {
            tracing::warn!(tool = %call.tool, "Unknown tool requested");
            finish(&mut obs, Err(format!("unknown tool {}", call.tool)));
            return Ok(obs);
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AgentError::Cancelled),
            result = tool.execute(call.args) => result,
        };

        match result {
            Ok(value) => finish(&mut obs, Ok(value)),
            Err(e) => {
                tracing::warn!(tool = %call.tool, error = %e, "Tool call failed");
                finish(&mut obs, Err(format!("{:#}", e)));
            }
        }
        Ok(obs)
    }

    fn log_observation(&self, obs: &Observation) {
        let duration_ms = obs.duration().map(|d| d.as_millis() as u64);
        tracing::info!(tool = %obs.tool, ok = obs.ok(), duration_ms = ?duration_ms, "Observation");

        let shown = obs
            .result()
            .cloned()
            .unwrap_or_else(|| json!({ "error": obs.error() }));
        if self.config.verbose {
            tracing::info!(tool = %obs.tool, "Result: {}", shown);
        } else {
            tracing::debug!(tool = %obs.tool, "Result: {}", shown);
        }
    }
}

/// Every observation here is fresh, so the first finish always succeeds.
fn finish(obs: &mut Observation, outcome: Result<Value, String>) {
    if let Err(e) = obs.finish(outcome) {
        tracing::error!(error = %e, "Observation finished twice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::test_utils::{CountingTool, MockLlm, ScriptedInput};
    use crate::agent::NonInteractive;
    use crate::llm::Role;

    const SEED_LEN: usize = 4;

    fn agent_with(llm: Arc<MockLlm>, tools: ToolRegistry, config: AgentConfig) -> Agent {
        Agent::new(config, llm, tools, Arc::new(NonInteractive))
    }

    fn registry(tools: Vec<CountingTool>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register(Arc::new(tool));
        }
        registry
    }

    fn observations_message(output: &RunOutput) -> Value {
        output
            .transcript
            .with_role(Role::Observation)
            .last()
            .and_then(|m| m.content.as_json())
            .cloned()
            .expect("an observations message")
    }

    #[test]
    fn transitions_follow_the_decision_kind() {
        assert_eq!(
            Transition::from_decision(Decision::Write {
                report: "  ".into(),
                confidence: Some(0.9)
            }),
            Transition::Finalize {
                report: EMPTY_REPORT_PLACEHOLDER.into(),
                confidence: Some(0.9)
            }
        );
        assert_eq!(
            Transition::from_decision(Decision::Call {
                calls: vec![],
                rationale: Some("thinking".into())
            }),
            Transition::Continue
        );
        assert_eq!(
            Transition::from_decision(Decision::Unknown { content: String::new() }),
            Transition::Continue
        );
    }

    #[tokio::test]
    async fn seeds_transcript_with_query_and_instructions() {
        let llm = Arc::new(MockLlm::new(vec![r#"{"action":"write","report":"ok"}"#]));
        let agent = agent_with(llm.clone(), ToolRegistry::new(), AgentConfig::default());

        agent.run("Tell me about Mew").await.unwrap();

        let request = llm.requests().remove(0);
        assert_eq!(request.messages.len(), SEED_LEN);
        assert_eq!(request.messages[0], ChatMessage::user("Tell me about Mew"));
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[2].role, Role::System);
        assert_eq!(request.messages[3], ChatMessage::system(CONTROLLER_INSTRUCTION));
        assert!(request.json_mode);
        assert_eq!(request.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn get_pokemon_call_produces_ok_observation() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[{"tool":"get_pokemon","args":{"name":"pikachu"}}]}"#,
            r#"{"action":"write","report":"Pikachu is Electric.","confidence":0.8}"#,
        ]));
        let tool = CountingTool::ok("get_pokemon", json!({"summary": {"name": "pikachu"}}));
        let calls = tool.calls();
        let agent = agent_with(llm.clone(), registry(vec![tool]), AgentConfig::default());

        let output = agent.run("pikachu?").await.unwrap();

        assert_eq!(output.report, "Pikachu is Electric.");
        assert_eq!(output.status, RunStatus::Completed { confidence: Some(0.8) });
        assert_eq!(output.steps, 2);
        assert_eq!(output.observations.len(), 1);
        let obs = &output.observations[0];
        assert!(obs.ok());
        assert_eq!(obs.tool, "get_pokemon");
        assert_eq!(obs.step, 1);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(
            calls_args(&calls_seen(&output)),
            vec![json!({"name": "pikachu"})]
        );

        // The second oracle call sees the observation.
        let second = &llm.requests()[1];
        assert_eq!(second.messages.len(), SEED_LEN + 1);
        assert_eq!(second.messages[SEED_LEN].role, Role::Observation);
    }

    fn calls_seen(output: &RunOutput) -> Vec<Value> {
        observations_message(output)["observations"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }

    fn calls_args(payloads: &[Value]) -> Vec<Value> {
        payloads.iter().map(|p| p["args"].clone()).collect()
    }

    #[tokio::test]
    async fn unknown_tool_is_an_observation_error_not_a_crash() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[{"tool":"nonexistent_tool","args":{}}]}"#,
            r#"{"action":"write","report":"done"}"#,
        ]));
        let agent = agent_with(llm, ToolRegistry::new(), AgentConfig::default());

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.observations.len(), 1);
        let obs = &output.observations[0];
        assert!(!obs.ok());
        assert!(obs.error().unwrap().contains("unknown tool"));
        assert_eq!(
            calls_seen(&output)[0]["result"],
            json!({"error": "unknown tool nonexistent_tool"})
        );
    }

    #[tokio::test]
    async fn blank_report_gets_placeholder() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"write","report":"  ","confidence":0.9}"#,
        ]));
        let agent = agent_with(llm, ToolRegistry::new(), AgentConfig::default());

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.report, "(no report returned)");
        assert_eq!(output.status, RunStatus::Completed { confidence: Some(0.9) });
    }

    #[tokio::test]
    async fn empty_oracle_reply_is_nudged_not_final() {
        let llm = Arc::new(MockLlm::new(vec![
            "",
            r#"{"action":"write","report":"real answer"}"#,
        ]));
        let agent = agent_with(llm.clone(), ToolRegistry::new(), AgentConfig::default());

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.report, "real answer");
        assert_eq!(output.steps, 2);
        assert_eq!(llm.requests().len(), 2);
        assert_eq!(
            output.transcript.messages()[SEED_LEN],
            ChatMessage::user(CONTINUE_NUDGE)
        );
    }

    #[tokio::test]
    async fn non_json_oracle_output_is_the_report() {
        let raw = "Charizard wins, obviously.";
        let llm = Arc::new(MockLlm::new(vec![raw]));
        let agent = agent_with(llm, ToolRegistry::new(), AgentConfig::default());

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.report, raw);
        assert_eq!(output.status, RunStatus::Completed { confidence: Some(0.0) });
        assert_eq!(output.steps, 1);
    }

    #[tokio::test]
    async fn n_calls_yield_n_observations_in_request_order() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[
                {"tool":"get_type","args":{"name":"fire"}},
                {"tool":"broken","args":{"n":1}},
                {"name":"nonexistent","arguments":{}},
                {"tool":"get_type","args":{"name":"water"}}
            ]}"#,
            r#"{"action":"write","report":"done"}"#,
        ]));
        let tools = registry(vec![
            CountingTool::ok("get_type", json!({"name": "fire"})),
            CountingTool::failing("broken", "upstream 500"),
        ]);
        let agent = agent_with(llm.clone(), tools, AgentConfig::default());

        let output = agent.run("q").await.unwrap();

        let tools_seen: Vec<_> = output.observations.iter().map(|o| o.tool.as_str()).collect();
        assert_eq!(tools_seen, vec!["get_type", "broken", "nonexistent", "get_type"]);
        let oks: Vec<_> = output.observations.iter().map(Observation::ok).collect();
        assert_eq!(oks, vec![true, false, false, true]);
        assert_eq!(output.observations[1].error(), Some("upstream 500"));

        // One consolidated message for the whole step.
        assert_eq!(output.transcript.with_role(Role::Observation).count(), 1);
        assert_eq!(
            calls_args(&calls_seen(&output)),
            vec![json!({"name": "fire"}), json!({"n": 1}), json!({}), json!({"name": "water"})]
        );
    }

    #[tokio::test]
    async fn clarification_bypasses_registry_and_adds_user_message() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[{"tool":"clarify_user","args":{"question":"Which game?"}}]}"#,
            r#"{"action":"write","report":"For Sapphire: Wingull."}"#,
        ]));
        let decoy = CountingTool::ok(CLARIFY_TOOL, json!({"response": "from registry"}));
        let decoy_calls = decoy.calls();
        let human = Arc::new(ScriptedInput::new(vec!["Sapphire"]));
        let agent = Agent::new(
            AgentConfig::default(),
            llm,
            registry(vec![decoy]),
            human.clone(),
        );

        let output = agent.run("easiest sea pokemon to catch").await.unwrap();

        assert_eq!(decoy_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(human.questions(), vec!["Which game?"]);
        assert_eq!(output.observations.len(), 1);
        assert_eq!(
            output.observations[0].result(),
            Some(&json!({"user_answer": "Sapphire"}))
        );
        let user_answers: Vec<_> = output
            .transcript
            .messages()
            .iter()
            .skip(SEED_LEN)
            .filter(|m| m.role == Role::User)
            .collect();
        assert_eq!(user_answers.len(), 1);
        assert_eq!(user_answers[0], &ChatMessage::user("Sapphire"));
    }

    #[tokio::test]
    async fn closed_input_is_an_empty_answer() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[{"tool":"clarify_user","args":{}}]}"#,
            r#"{"action":"write","report":"assumed in-game"}"#,
        ]));
        let human = Arc::new(ScriptedInput::new(vec![]));
        let agent = Agent::new(AgentConfig::default(), llm, ToolRegistry::new(), human.clone());

        let output = agent.run("q").await.unwrap();

        assert_eq!(human.questions(), vec!["Could you clarify your request?"]);
        assert_eq!(
            output.observations[0].result(),
            Some(&json!({"user_answer": ""}))
        );
        assert!(output
            .transcript
            .messages()
            .contains(&ChatMessage::user(NO_ANSWER)));
    }

    #[tokio::test]
    async fn budget_exhaustion_returns_advisory_and_bounded_growth() {
        let llm = Arc::new(MockLlm::repeating(
            r#"{"action":"call","calls":[{"tool":"get_type","args":{"name":"fire"}}]}"#,
        ));
        let config = AgentConfig {
            max_steps: 3,
            ..AgentConfig::default()
        };
        let agent = agent_with(
            llm.clone(),
            registry(vec![CountingTool::ok("get_type", json!({}))]),
            config,
        );

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.report, STEP_BUDGET_EXHAUSTED);
        assert_eq!(output.status, RunStatus::Exhausted);
        assert_eq!(output.steps, 3);
        assert_eq!(llm.requests().len(), 3);
        assert!(output.transcript.len() <= SEED_LEN + 3);
    }

    #[tokio::test]
    async fn empty_and_unknown_decisions_nudge_the_oracle() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[]}"#,
            r#"{"action":"ponder"}"#,
            r#"{"action":"write","report":"done"}"#,
        ]));
        let agent = agent_with(llm, ToolRegistry::new(), AgentConfig::default());

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.steps, 3);
        let tail: Vec<_> = output.transcript.messages()[SEED_LEN..].to_vec();
        assert_eq!(
            tail,
            vec![ChatMessage::user(CONTINUE_NUDGE), ChatMessage::user(CONTINUE_NUDGE)]
        );
    }

    #[tokio::test]
    async fn echo_decisions_appends_raw_controller() {
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","reasoning":"look it up","calls":[{"tool":"get_type","args":{"name":"fire"}}]}"#,
            r#"{"action":"write","report":"done"}"#,
        ]));
        let config = AgentConfig {
            echo_decisions: true,
            ..AgentConfig::default()
        };
        let agent = agent_with(
            llm,
            registry(vec![CountingTool::ok("get_type", json!({}))]),
            config,
        );

        let output = agent.run("q").await.unwrap();

        let echoed = &output.transcript.messages()[SEED_LEN];
        assert_eq!(echoed.role, Role::Assistant);
        assert_eq!(echoed.content.as_json().unwrap()["reasoning"], "look it up");
        assert_eq!(output.transcript.messages()[SEED_LEN + 1].role, Role::Observation);
    }

    #[tokio::test]
    async fn oversized_results_are_truncated_in_transcript_only() {
        let big = "x".repeat(1000);
        let llm = Arc::new(MockLlm::new(vec![
            r#"{"action":"call","calls":[{"tool":"get_move","args":{}}]}"#,
            r#"{"action":"write","report":"done"}"#,
        ]));
        let config = AgentConfig {
            observation_max_chars: 200,
            ..AgentConfig::default()
        };
        let agent = agent_with(
            llm,
            registry(vec![CountingTool::ok("get_move", json!(big.clone()))]),
            config,
        );

        let output = agent.run("q").await.unwrap();

        assert_eq!(output.observations[0].result(), Some(&json!(big)));
        let shown = calls_seen(&output)[0]["result"].as_str().unwrap().to_string();
        assert!(shown.ends_with(crate::agent::TRUNCATION_MARKER));
        assert!(shown.chars().count() < 200);
    }

    #[tokio::test]
    async fn oracle_failure_propagates() {
        let llm = Arc::new(MockLlm::failing(503));
        let agent = agent_with(llm, ToolRegistry::new(), AgentConfig::default());

        let err = agent.run("q").await.unwrap_err();

        assert!(matches!(err, AgentError::Oracle(LlmError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn cancelled_run_stops_before_calling_oracle() {
        let llm = Arc::new(MockLlm::repeating(r#"{"action":"write","report":"x"}"#));
        let agent = agent_with(llm.clone(), ToolRegistry::new(), AgentConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = agent.run_with_cancel("q", &cancel).await.unwrap_err();

        assert!(matches!(err, AgentError::Cancelled));
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn agent_is_reusable_across_runs() {
        let llm = Arc::new(MockLlm::repeating(r#"{"action":"write","report":"same"}"#));
        let agent = agent_with(llm.clone(), ToolRegistry::new(), AgentConfig::default());

        let first = agent.run("one").await.unwrap();
        let second = agent.run("two").await.unwrap();

        assert_eq!(first.transcript.len(), SEED_LEN);
        assert_eq!(second.transcript.len(), SEED_LEN);
        assert_eq!(second.transcript.messages()[0], ChatMessage::user("two"));
    }
}
