//! Tool registry: the fixed set of read-only PokéAPI lookups the agent may call.
//!
//! Every tool receives a JSON argument object and returns a compact JSON
//! summary. Handlers may fail; the agent loop turns failures into observations.

mod battle;
mod games;
mod pokemon;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::pokeapi::PokeApi;

pub use battle::{GetAbility, GetMove, GetType};
pub use games::{GetEncounterCondition, GetGeneration, GetVersion};
pub use pokemon::{EncountersForPokemon, GetPokemon, GetPokemonSpecies, ListPokemonByHabitat};

/// A tool the oracle can request by name.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the argument object.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> anyhow::Result<Value>;
}

/// Name and description, for prompt building.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Ordered name -> tool mapping.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every PokéAPI tool, all sharing one client.
    pub fn with_pokeapi(api: Arc<PokeApi>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GetPokemon::new(api.clone())));
        registry.register(Arc::new(GetPokemonSpecies::new(api.clone())));
        registry.register(Arc::new(GetType::new(api.clone())));
        registry.register(Arc::new(GetMove::new(api.clone())));
        registry.register(Arc::new(ListPokemonByHabitat::new(api.clone())));
        registry.register(Arc::new(EncountersForPokemon::new(api.clone())));
        registry.register(Arc::new(GetGeneration::new(api.clone())));
        registry.register(Arc::new(GetVersion::new(api.clone())));
        registry.register(Arc::new(GetAbility::new(api.clone())));
        registry.register(Arc::new(GetEncounterCondition::new(api)));
        registry
    }

    /// Add a tool; a tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Invoke a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown tool {}", name))?;
        tool.execute(args).await
    }
}

/// Schema for tools taking one required string argument.
pub(crate) fn single_string_schema(key: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            key: {
                "type": "string",
                "description": description
            }
        },
        "required": [key]
    })
}

/// First non-empty string (or number) found under any of `keys`.
pub(crate) fn required_str(args: &Value, keys: &[&str]) -> anyhow::Result<String> {
    for key in keys {
        match &args[*key] {
            Value::String(s) if !s.trim().is_empty() => return Ok(s.trim().to_string()),
            Value::Number(n) => return Ok(n.to_string()),
            _ => {}
        }
    }
    Err(anyhow::anyhow!("Missing '{}' argument", keys[0]))
}

/// Names of the first `limit` entries of `list`, reading `entry[field]["name"]`.
pub(crate) fn nested_names(list: &Value, field: &str, limit: usize) -> Vec<String> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item[field]["name"].as_str())
                .take(limit)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Names of every `{ "name": .. }` entry in `list`.
pub(crate) fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// First English entry's `field` from a localized list such as `effect_entries`.
pub(crate) fn english(entries: &Value, field: &str) -> Value {
    entries
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .find(|e| e["language"]["name"] == "en")
                .map(|e| e[field].clone())
        })
        .unwrap_or(Value::Null)
}
