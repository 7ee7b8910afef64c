//! Generation, game version and encounter-condition lookups.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{names, required_str, single_string_schema, Tool};
use crate::pokeapi::PokeApi;

pub struct GetGeneration {
    api: Arc<PokeApi>,
}

impl GetGeneration {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetGeneration {
    fn name(&self) -> &str {
        "generation"
    }

    fn description(&self) -> &str {
        "Fetch generation details and supported version groups."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("id_or_name", "Generation number or name such as generation-iii")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let key = required_str(&args, &["id_or_name", "name", "id"])?;
        let data = self.api.generation(&key).await?;
        Ok(json!({
            "name": data["name"],
            "main_region": data["main_region"]["name"],
            "version_groups": names(&data["version_groups"]),
        }))
    }
}

/// Ties a game version to its version group (ruby -> ruby-sapphire).
pub struct GetVersion {
    api: Arc<PokeApi>,
}

impl GetVersion {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetVersion {
    fn name(&self) -> &str {
        "version"
    }

    fn description(&self) -> &str {
        "Fetch version details and linked version group (e.g., ruby -> ruby-sapphire)."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Game version name such as sapphire or heartgold")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "version"])?;
        let data = self.api.version(&name).await?;
        Ok(json!({
            "name": data["name"],
            "version_group": data["version_group"]["name"],
        }))
    }
}

pub struct GetEncounterCondition {
    api: Arc<PokeApi>,
}

impl GetEncounterCondition {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetEncounterCondition {
    fn name(&self) -> &str {
        "get_encounter_condition"
    }

    fn description(&self) -> &str {
        "Fetch an encounter condition (e.g., 'time') and list its possible values."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("id_or_name", "Condition id or name such as time or season")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let key = required_str(&args, &["id_or_name", "name", "id"])?;
        let data = self.api.encounter_condition(&key).await?;
        Ok(summarize_encounter_condition(&data))
    }
}

pub(crate) fn summarize_encounter_condition(data: &Value) -> Value {
    let values: Vec<Value> = data["values"]
        .as_array()
        .map(|values| {
            values
                .iter()
                .map(|v| {
                    // The value id is the last segment of its resource URL.
                    let id = v["url"]
                        .as_str()
                        .map(|url| url.trim_end_matches('/'))
                        .filter(|url| !url.is_empty())
                        .and_then(|url| url.rsplit('/').next())
                        .map(str::to_string);
                    json!({ "id": id, "name": v["name"] })
                })
                .collect()
        })
        .unwrap_or_default();

    let display_name = data["names"]
        .as_array()
        .and_then(|names| names.iter().find(|n| n["language"]["name"] == "en"))
        .map(|n| n["name"].clone())
        .filter(|n| !n.is_null())
        .unwrap_or_else(|| data["name"].clone());

    json!({
        "id": data["id"],
        "name": data["name"],
        "display_name": display_name,
        "value_count": values.len(),
        "values": values,
    })
}
