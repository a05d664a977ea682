//! Catalog of zero-cost models, discovered once at startup.
//!
//! The upstream listing at `<base_url>/models` is filtered down to models whose
//! input and output prices are both exactly zero and that report at least one
//! serving endpoint. Each survivor is keyed by display name and mapped to its
//! free-tier identifier (`<id>:free`).


use crate::config::Config;
use crate::error::LlmBoxError;
use crate::http::{create_client, status_error};
use reqwest::Client;
use serde_json::Value;

/// Price assumed when the listing omits one, so absence never reads as free.
pub const MISSING_PRICE_SENTINEL: f64 = 999.0;

/// Suffix selecting the free tier of an upstream model.
pub const FREE_TIER_SUFFIX: &str = ":free";

/// Entries used when discovery fails or finds nothing.
pub const FALLBACK_MODELS: [(&str, &str); 2] = [
    ("llama-4-maverick", "meta-llama/llama-4-maverick:free"),
    (
        "mistral-small-3.1-24b-instruct",
        "mistralai/mistral-small-3.1-24b-instruct:free",
    ),
];

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub display_name: String,
    pub identifier: String,
}

/// Ordered `display_name -> identifier` mapping.
///
/// Order follows first appearance. Inserting an existing name replaces its
/// identifier in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hardcoded catalog used when the upstream listing is unusable.
    pub fn fallback() -> Self {
        FALLBACK_MODELS.into_iter().collect()
    }

    pub fn insert(&mut self, display_name: impl Into<String>, identifier: impl Into<String>) {
        let display_name = display_name.into();
        let identifier = identifier.into();

        match self.entries.iter_mut().find(|e| e.display_name == display_name) {
            Some(existing) => existing.identifier = identifier,
            None => self.entries.push(ModelEntry {
                display_name,
                identifier,
            }),
        }
    }

    /// Resolve a display name to its upstream identifier.
    pub fn get(&self, display_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.display_name == display_name)
            .map(|e| e.identifier.as_str())
    }

    pub fn contains(&self, display_name: &str) -> bool {
        self.get(display_name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.display_name.as_str())
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, I: Into<String>> FromIterator<(N, I)> for ModelCatalog {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (name, identifier) in iter {
            catalog.insert(name, identifier);
        }
        catalog
    }
}

/// Fetches and filters the upstream model listing.
#[derive(Clone)]
pub struct CatalogLoader {
    client: Client,
    models_url: String,
    api_key: Option<String>,
}

impl CatalogLoader {
    pub fn new(client: Client, models_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            models_url: models_url.into(),
            api_key,
        }
    }

    /// Build a loader from the upstream and API key sections of the config.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            create_client(&config.upstream)?,
            config.upstream.models_url(),
            config.api_keys.openrouter.clone(),
        ))
    }

    /// Query the listing once and return every qualifying model.
    ///
    /// An empty catalog is a valid `Ok` result here; [`load_catalog`](Self::load_catalog)
    /// decides what to do with it.
    pub async fn fetch_free_models(&self) -> Result<ModelCatalog, LlmBoxError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmBoxError::ApiKeyMissing("OpenRouter".to_string()))?;

        let response = self
            .client
            .get(&self.models_url)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: Value = response.json().await?;
        let models = body
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(filter_free_models(models))
    }

    /// Discover free models, substituting the fallback catalog on any failure.
    pub async fn load_catalog(&self) -> ModelCatalog {
        match self.fetch_free_models().await {
            Ok(catalog) if !catalog.is_empty() => {
                tracing::info!("Loaded {} free models:", catalog.len());
                for name in catalog.names() {
                    tracing::info!("  - {}", name);
                }
                catalog
            }
            Ok(_) => {
                tracing::warn!("No valid models found, using fallback catalog");
                ModelCatalog::fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch models from upstream");
                tracing::warn!("Using fallback catalog");
                ModelCatalog::fallback()
            }
        }
    }
}

/// Keep only zero-cost models with a serving endpoint.
pub fn filter_free_models(models: &[Value]) -> ModelCatalog {
    models
        .iter()
        .filter_map(|model| {
            let id = model.get("id")?.as_str()?;
            let pricing = model.get("pricing").unwrap_or(&Value::Null);

            let input_price = price(pricing, "usd_per_million_input_tokens");
            let output_price = price(pricing, "usd_per_million_output_tokens");
            let has_endpoints = model.get("endpoints").is_some_and(is_truthy);

            if input_price == 0.0 && output_price == 0.0 && has_endpoints {
                let name = model.get("name").and_then(Value::as_str).unwrap_or(id);
                Some((name, format!("{}{}", id, FREE_TIER_SUFFIX)))
            } else {
                None
            }
        })
        .collect()
}

fn price(pricing: &Value, field: &str) -> f64 {
    pricing
        .get(field)
        .and_then(Value::as_f64)
        .unwrap_or(MISSING_PRICE_SENTINEL)
}

/// JSON truthiness: non-empty containers and strings, `true`, non-zero numbers.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
