//! Type chart, move and ability lookups.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{english, names, nested_names, required_str, single_string_schema, Tool};
use crate::pokeapi::PokeApi;

const POKEMON_LIMIT: usize = 20;

/// Damage relations of one type plus a sample of Pokémon having it.
pub struct GetType {
    api: Arc<PokeApi>,
}

impl GetType {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetType {
    fn name(&self) -> &str {
        "get_type"
    }

    fn description(&self) -> &str {
        "Fetch type chart relations for a given Pokemon type name."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Type name such as fire, water, electric")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "type"])?;
        let data = self.api.pokemon_type(&name).await?;
        Ok(summarize_type(&data))
    }
}

pub(crate) fn summarize_type(data: &Value) -> Value {
    let relations = &data["damage_relations"];
    json!({
        "name": data["name"],
        "double_damage_to": names(&relations["double_damage_to"]),
        "double_damage_from": names(&relations["double_damage_from"]),
        "half_damage_to": names(&relations["half_damage_to"]),
        "half_damage_from": names(&relations["half_damage_from"]),
        "no_damage_to": names(&relations["no_damage_to"]),
        "no_damage_from": names(&relations["no_damage_from"]),
        "pokemon_of_type": nested_names(&data["pokemon"], "pokemon", POKEMON_LIMIT),
    })
}

pub struct GetMove {
    api: Arc<PokeApi>,
}

impl GetMove {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetMove {
    fn name(&self) -> &str {
        "get_move"
    }

    fn description(&self) -> &str {
        "Fetch move details by name (type, power, PP, accuracy, damage class, effect)."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Move name such as thunderbolt or surf")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "move"])?;
        let data = self.api.r#move(&name).await?;
        Ok(json!({
            "name": data["name"],
            "type": data["type"]["name"],
            "power": data["power"],
            "pp": data["pp"],
            "accuracy": data["accuracy"],
            "damage_class": data["damage_class"]["name"],
            "effect": english(&data["effect_entries"], "short_effect"),
        }))
    }
}

pub struct GetAbility {
    api: Arc<PokeApi>,
}

impl GetAbility {
    pub fn new(api: Arc<PokeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetAbility {
    fn name(&self) -> &str {
        "get_ability"
    }

    fn description(&self) -> &str {
        "Fetch a Pokemon ability (effect, short effect, generation, main-series flag, and which Pokemon can have it)."
    }

    fn parameters_schema(&self) -> Value {
        single_string_schema("name", "Ability name such as static or levitate")
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let name = required_str(&args, &["name", "ability"])?;
        let data = self.api.ability(&name).await?;
        Ok(summarize_ability(&data))
    }
}

pub(crate) fn summarize_ability(data: &Value) -> Value {
    json!({
        "name": data["name"],
        "generation": data["generation"]["name"],
        "is_main_series": data["is_main_series"],
        "effect": english(&data["effect_entries"], "effect"),
        "short_effect": english(&data["effect_entries"], "short_effect"),
        "pokemon_with_ability": nested_names(&data["pokemon"], "pokemon", POKEMON_LIMIT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_summary_flattens_damage_relations() {
        let data = json!({
            "name": "electric",
            "damage_relations": {
                "double_damage_to": [{"name": "water"}, {"name": "flying"}],
                "no_damage_to": [{"name": "ground"}],
                "double_damage_from": [{"name": "ground"}]
            },
            "pokemon": [{"pokemon": {"name": "pikachu"}}]
        });

        let summary = summarize_type(&data);
        assert_eq!(summary["double_damage_to"], json!(["water", "flying"]));
        assert_eq!(summary["no_damage_to"], json!(["ground"]));
        assert_eq!(summary["half_damage_from"], json!([]));
        assert_eq!(summary["pokemon_of_type"], json!(["pikachu"]));
    }

    #[test]
    fn ability_summary_limits_pokemon_list() {
        let pokemon: Vec<Value> = (0..25)
            .map(|i| json!({"pokemon": {"name": format!("mon-{}", i)}}))
            .collect();
        let data = json!({
            "name": "levitate",
            "generation": {"name": "generation-iii"},
            "is_main_series": true,
            "effect_entries": [{"effect": "Immune to Ground.", "short_effect": "Ground immunity.", "language": {"name": "en"}}],
            "pokemon": pokemon,
        });

        let summary = summarize_ability(&data);
        assert_eq!(summary["generation"], "generation-iii");
        assert_eq!(summary["short_effect"], "Ground immunity.");
        assert_eq!(summary["pokemon_with_ability"].as_array().unwrap().len(), 20);
    }
}
