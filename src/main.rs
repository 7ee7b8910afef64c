//! PokeDeep - command-line entry point.
//!
//! Answers one question (`--query`) or runs an interactive loop until the
//! user types `exit`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use pokedeep::agent::{
    Agent, AgentError, ConsoleLines, HumanInput, NonInteractive, RunStatus, StdinInput,
};
use pokedeep::config::{parse_bool, AgentConfig, Config, DEFAULT_MODEL};
use pokedeep::llm::OpenAiClient;
use pokedeep::pokeapi::PokeApi;
use pokedeep::report::save_report;
use pokedeep::tools::ToolRegistry;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// PokeDeep: a deep-research agent for Pokémon questions.
#[derive(Parser, Debug)]
#[command(name = "pokedeep", version, about)]
struct Args {
    /// Oracle model identifier
    #[arg(long, env = "MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum oracle round trips per question
    #[arg(long, default_value_t = 6)]
    max_steps: usize,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.4)]
    temperature: f32,

    /// Log tool results in full
    #[arg(long, short)]
    verbose: bool,

    /// Append each raw controller decision to the transcript
    #[arg(long)]
    echo_decisions: bool,

    /// Observation size above which results are truncated for the oracle
    #[arg(long, default_value_t = 4000)]
    observation_max_chars: usize,

    /// Answer this question and exit
    #[arg(long, short)]
    query: Option<String>,

    /// Never ask clarifying questions or prompt to save
    #[arg(long)]
    non_interactive: bool,

    /// Save every report without asking
    #[arg(long)]
    save: bool,
}

impl Args {
    fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            model: self.model.clone(),
            max_steps: self.max_steps,
            temperature: self.temperature,
            verbose: self.verbose,
            observation_max_chars: self.observation_max_chars,
            echo_decisions: self.echo_decisions,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let default_filter = if args.verbose { "pokedeep=debug" } else { "pokedeep=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", args.model);

    let pokeapi = Arc::new(PokeApi::new(&config.pokeapi_base_url, config.pokeapi_timeout)?);
    let tools = ToolRegistry::with_pokeapi(pokeapi);
    let llm = Arc::new(OpenAiClient::new(
        config.api_key.clone(),
        &config.oracle_base_url,
        config.oracle_timeout,
    )?);
    let console = ConsoleLines::spawn();
    let human: Arc<dyn HumanInput> = if args.non_interactive {
        Arc::new(NonInteractive)
    } else {
        Arc::new(StdinInput::new(console.clone()))
    };
    let agent = Agent::new(args.agent_config(), llm, tools, human);
    info!("Registered {} tools", agent.tools().len());

    let interrupts = Arc::new(Interrupts::default());
    spawn_ctrl_c_listener(interrupts.clone());

    let session = Session {
        agent,
        args: &args,
        console,
        interrupts,
        reports_dir: &config.reports_dir,
    };

    if let Some(query) = args.query.as_deref() {
        return session.answer(query).await;
    }

    while let Some(line) = session
        .console
        .read_line("\nWhat would you like to know? (or 'exit' to quit): ")
        .await
    {
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        if let Err(e) = session.answer(query).await {
            eprintln!("Error: {:#}", e);
        }
    }

    Ok(())
}

/// Routes Ctrl-C to the run in progress, if any.
#[derive(Default)]
struct Interrupts {
    active: Mutex<Option<CancellationToken>>,
}

impl Interrupts {
    /// Register a new run and return its token.
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.slot() = Some(token.clone());
        token
    }

    fn end(&self) {
        self.slot().take();
    }

    /// Cancel the active run. False when no run is active.
    fn interrupt(&self) -> bool {
        match self.slot().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One listener for the whole process: cancel the active run, or exit when idle.
fn spawn_ctrl_c_listener(interrupts: Arc<Interrupts>) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !interrupts.interrupt() {
                eprintln!();
                std::process::exit(130);
            }
        }
    });
}

struct Session<'a> {
    agent: Agent,
    args: &'a Args,
    console: Arc<ConsoleLines>,
    interrupts: Arc<Interrupts>,
    reports_dir: &'a Path,
}

impl Session<'_> {
    /// Run one question, print the report, and save it if asked to.
    async fn answer(&self, query: &str) -> anyhow::Result<()> {
        let cancel = self.interrupts.begin();
        let result = self.agent.run_with_cancel(query, &cancel).await;
        self.interrupts.end();

        let output = match result {
            Ok(output) => output,
            Err(AgentError::Cancelled) => {
                eprintln!("\nRun cancelled.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        info!(steps = output.steps, observations = output.observations.len(), "Run finished");
        if let RunStatus::Completed { confidence: Some(c) } = output.status {
            info!("Confidence: {:.2}", c);
        }
        println!("\n{}\n", output.report);

        if self.should_save().await {
            let path = save_report(self.reports_dir, query, &output.report, chrono::Local::now())?;
            println!("Saved to {}", path.display());
        }
        Ok(())
    }

    async fn should_save(&self) -> bool {
        if self.args.save {
            return true;
        }
        if self.args.non_interactive {
            return false;
        }
        self.console
            .read_line("Do you want to save the final output? (y/n): ")
            .await
            .and_then(|answer| parse_bool(&answer).ok())
            .unwrap_or(false)
    }
}
