//! PokéAPI endpoint client.
//!
//! One explicitly constructed instance is shared by every tool through an `Arc`.

use std::time::Duration;

use serde_json::Value;

use crate::http::{HttpClient, HttpError};

pub struct PokeApi {
    http: HttpClient,
}

impl PokeApi {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    async fn fetch(&self, resource: &str, key: &str) -> Result<Value, HttpError> {
        self.http
            .get_json(&format!("/{}/{}", resource, resource_key(key)))
            .await
    }

    pub async fn pokemon(&self, name: &str) -> Result<Value, HttpError> {
        self.fetch("pokemon", name).await
    }

    pub async fn pokemon_species(&self, name: &str) -> Result<Value, HttpError> {
        self.fetch("pokemon-species", name).await
    }

    pub async fn pokemon_type(&self, name: &str) -> Result<Value, HttpError> {
        self.fetch("type", name).await
    }

    pub async fn r#move(&self, name: &str) -> Result<Value, HttpError> {
        self.fetch("move", name).await
    }

    pub async fn habitat(&self, habitat: &str) -> Result<Value, HttpError> {
        self.fetch("pokemon-habitat", habitat).await
    }

    pub async fn encounters(&self, name: &str) -> Result<Value, HttpError> {
        self.http
            .get_json(&format!("/pokemon/{}/encounters", resource_key(name)))
            .await
    }

    pub async fn generation(&self, id_or_name: &str) -> Result<Value, HttpError> {
        self.fetch("generation", id_or_name).await
    }

    pub async fn version(&self, name: &str) -> Result<Value, HttpError> {
        self.fetch("version", name).await
    }

    pub async fn ability(&self, name: &str) -> Result<Value, HttpError> {
        self.fetch("ability", name).await
    }

    pub async fn encounter_condition(&self, id_or_name: &str) -> Result<Value, HttpError> {
        self.fetch("encounter-condition", id_or_name).await
    }
}

/// PokéAPI keys are lowercase with hyphens between words ("Tapu Koko" -> "tapu-koko").
/// The key is URL-encoded so it always stays a single path segment.
pub fn resource_key(raw: &str) -> String {
    let key = raw
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    urlencoding::encode(&key).into_owned()
}
