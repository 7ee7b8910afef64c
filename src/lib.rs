//! # PokeDeep
//!
//! A reactive research agent that answers Pokémon questions by calling
//! PokéAPI lookups in a loop and writing a Markdown report.
//!
//! ## Architecture
//!
//! The agent follows a JSON-controller "tools in a loop" pattern:
//! 1. Seed the transcript with the question, a planning instruction and the
//!    tool listing
//! 2. Ask the oracle for a decision: call tools, or write the report
//! 3. Execute the calls in order, feed one observations message back
//! 4. Repeat until a report is written or the step budget runs out
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pokedeep::{agent::{Agent, NonInteractive}, config::{AgentConfig, Config}};
//! use pokedeep::{llm::OpenAiClient, pokeapi::PokeApi, tools::ToolRegistry};
//!
//! let config = Config::from_env()?;
//! let api = Arc::new(PokeApi::new(&config.pokeapi_base_url, config.pokeapi_timeout)?);
//! let llm = Arc::new(OpenAiClient::new(config.api_key.clone(), &config.oracle_base_url, config.oracle_timeout)?);
//! let agent = Agent::new(AgentConfig::default(), llm, ToolRegistry::with_pokeapi(api), Arc::new(NonInteractive));
//! let output = agent.run("Best Water-type to train in Emerald?").await?;
//! println!("{}", output.report);
//! ```

pub mod agent;
pub mod config;
pub mod http;
pub mod llm;
pub mod pokeapi;
pub mod report;
pub mod retry;
pub mod tools;

pub use config::Config;
