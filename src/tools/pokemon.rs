//! Pokémon, species, habitat and encounter lookups.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{english, nested_names, required_str, single_string_schema, Tool};
use crate::pokeapi::PokeApi;

const MOVE_LIMIT: usize = 20;

/// Core data about a Pokémon: types, stats, abilities, first moves.
pub struct GetPokemon {
    api: Arc<PokeApi>,
}

impl GetPokemon {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetPokemon {
    fn name(&self) -> &str {
        "get_pokemon"
    }

    fn description(&self) -> &str {
        "Fetch core data about a Pokemon by name (types, stats, abilities)."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Pokemon name or national dex number")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "name_or_id", "id"])?;
        let data = self.api.pokemon(&name).await?;
        Ok(summarize_pokemon(&data))
    }
}

pub(crate) fn summarize_pokemon(data: &Value) -> Value {
    let stats: serde_json::Map<String, Value> = data["stats"]
        .as_array()
        .map(|stats| {
            stats
                .iter()
                .filter_map(|s| Some((s["stat"]["name"].as_str()?.to_string(), s["base_stat"].clone())))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "summary": {
            "name": data["name"],
            "types": nested_names(&data["types"], "type", usize::MAX),
            "base_experience": data["base_experience"],
            "stats": stats,
            "abilities": nested_names(&data["abilities"], "ability", usize::MAX),
            "moves_count": data["moves"].as_array().map_or(0, Vec::len),
            "moves": nested_names(&data["moves"], "move", MOVE_LIMIT),
        }
    })
}

/// Species-level facts: habitat, growth rate, legendary flags, capture rate.
pub struct GetPokemonSpecies {
    api: Arc<PokeApi>,
}

impl GetPokemonSpecies {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetPokemonSpecies {
    fn name(&self) -> &str {
        "get_pokemon_species"
    }

    fn description(&self) -> &str {
        "Fetch additional data about a Pokemon species (habitat, growth rate, legendary/mythical flags, capture rate)."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Pokemon species name or number")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "name_or_id", "id"])?;
        let data = self.api.pokemon_species(&name).await?;
        Ok(summarize_species(&data))
    }
}

pub(crate) fn summarize_species(data: &Value) -> Value {
    json!({
        "name": data["name"],
        "habitat": data["habitat"]["name"],
        "growth_rate": data["growth_rate"]["name"],
        "is_legendary": data["is_legendary"].as_bool().unwrap_or(false),
        "is_mythical": data["is_mythical"].as_bool().unwrap_or(false),
        "capture_rate": data["capture_rate"],
        "flavor": english(&data["flavor_text_entries"], "flavor_text"),
    })
}

/// Species living in a habitat.
pub struct ListPokemonByHabitat {
    api: Arc<PokeApi>,
}

impl ListPokemonByHabitat {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListPokemonByHabitat {
    fn name(&self) -> &str {
        "list_pokemon_by_habitat"
    }

    fn description(&self) -> &str {
        "List Pokemon species that belong to a given habitat (e.g., sea, cave, forest)."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("habitat", "Habitat name such as sea, cave, forest, grassland")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let habitat = required_str(&args, &["habitat", "name"])?;
        let data = self.api.habitat(&habitat).await?;
        Ok(json!({
            "habitat": data["name"],
            "species": super::names(&data["pokemon_species"]),
        }))
    }
}

/// Where a Pokémon can be encountered, per game version.
pub struct EncountersForPokemon {
    api: Arc<PokeApi>,
}

impl EncountersForPokemon {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for EncountersForPokemon {
    fn name(&self) -> &str {
        "encounters_for_pokemon"
    }

    fn description(&self) -> &str {
        "List encounter locations and version availability for a Pokemon by name."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Pokemon name")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "name_or_id"])?;
        let data = self.api.encounters(&name).await?;
        Ok(summarize_encounters(&name, &data))
    }
}

pub(crate) fn summarize_encounters(name: &str, data: &Value) -> Value {
    let encounters: Vec<Value> = data
        .as_array()
        .map(|areas| {
            areas
                .iter()
                .map(|area| {
                    // Sorted and deduplicated.
                    let versions: BTreeSet<String> =
                        nested_names(&area["version_details"], "version", usize::MAX)
                            .into_iter()
                            .collect();
                    json!({
                        "location_area": area["location_area"]["name"],
                        "versions": versions,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({ "name": name.to_lowercase(), "encounters": encounters })
}
