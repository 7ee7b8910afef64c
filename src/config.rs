//! Configuration management for PokeDeep.
//!
//! Connection settings are read from environment variables (a `.env` file is
//! honoured by the binary):
//! - `AI_API_KEY` - Required. API key for the chat-completions oracle.
//!   `OPENAI_API_KEY` is accepted as a fallback.
//! - `OPENAI_BASE_URL` - Optional. Oracle base URL. Defaults to `https://api.openai.com/v1`.
//! - `POKEAPI_BASE_URL` - Optional. Defaults to `https://pokeapi.co/api/v2`.
//! - `ORACLE_TIMEOUT_SECS` - Optional. Per-request oracle timeout. Defaults to `60`.
//! - `POKEAPI_TIMEOUT_SECS` - Optional. Per-request PokéAPI timeout. Defaults to `20`.
//! - `REPORTS_DIR` - Optional. Where saved reports go. Defaults to `generated_reports`.
//!
//! Per-run agent behaviour lives in [`AgentConfig`] and is filled from CLI flags.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ORACLE_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection configuration for the oracle and the data source.
#[derive(Debug, Clone)]
pub struct Config {
    /// Oracle API key
    pub api_key: String,

    /// Base URL of the OpenAI-compatible chat-completions endpoint
    pub oracle_base_url: String,

    /// Timeout applied to every oracle request
    pub oracle_timeout: Duration,

    /// PokéAPI base URL
    pub pokeapi_base_url: String,

    /// Timeout applied to every PokéAPI request
    pub pokeapi_timeout: Duration,

    /// Directory for persisted reports
    pub reports_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if neither `AI_API_KEY` nor
    /// `OPENAI_API_KEY` is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("AI_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| ConfigError::MissingEnvVar("AI_API_KEY".to_string()))?;

        let oracle_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ORACLE_BASE_URL.to_string());

        let pokeapi_base_url = std::env::var("POKEAPI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_POKEAPI_BASE_URL.to_string());

        let oracle_timeout = Duration::from_secs(parse_env_or("ORACLE_TIMEOUT_SECS", 60)?);
        let pokeapi_timeout = Duration::from_secs(parse_env_or("POKEAPI_TIMEOUT_SECS", 20)?);

        let reports_dir = std::env::var("REPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("generated_reports"));

        Ok(Self {
            api_key,
            oracle_base_url,
            oracle_timeout,
            pokeapi_base_url,
            pokeapi_timeout,
            reports_dir,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            oracle_base_url: DEFAULT_ORACLE_BASE_URL.to_string(),
            oracle_timeout: Duration::from_secs(60),
            pokeapi_base_url: DEFAULT_POKEAPI_BASE_URL.to_string(),
            pokeapi_timeout: Duration::from_secs(20),
            reports_dir: PathBuf::from("generated_reports"),
        }
    }
}

/// Per-run behaviour of the agent loop.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Oracle model identifier
    pub model: String,

    /// Maximum number of oracle round trips before the run is abandoned
    pub max_steps: usize,

    /// Sampling temperature sent with every oracle request
    pub temperature: f32,

    /// Log full observation payloads
    pub verbose: bool,

    /// Serialized observation size above which payloads are truncated
    pub observation_max_chars: usize,

    /// Re-append each raw controller decision as an assistant message
    pub echo_decisions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_steps: 6,
            temperature: 0.4,
            verbose: false,
            observation_max_chars: 4000,
            echo_decisions: false,
        }
    }
}

fn parse_env_or(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

/// Parse a boolean-like flag value (`1`, `yes`, `off`, ...).
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
