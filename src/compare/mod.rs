//! Fan a single prompt out to the models a caller selected.
//!
//! Calls run one after another in selection order. Each model's outcome is
//! kept as a `Result`, so one failure never touches another model's entry.


use crate::catalog::ModelCatalog;
use crate::config::{Config, LogVerbosity};
use crate::error::LlmBoxError;
use crate::http::{create_client, status_error};
use crate::logger::format_outcome;
use reqwest::Client;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;
use std::time::Instant;

/// Result of querying one model.
pub type ModelOutcome = Result<String, LlmBoxError>;

/// Caller toggles, `display_name -> enabled`, in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections(Vec<(String, bool)>);

impl Selections {
    /// Set a toggle. A repeated name keeps its first position.
    pub fn set(&mut self, display_name: impl Into<String>, enabled: bool) {
        let display_name = display_name.into();
        match self.0.iter_mut().find(|(name, _)| *name == display_name) {
            Some(existing) => existing.1 = enabled,
            None => self.0.push((display_name, enabled)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// Enabled names that the catalog knows, paired with their identifiers.
    pub fn resolve<'a>(
        &'a self,
        catalog: &'a ModelCatalog,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter()
            .filter(|(_, enabled)| *enabled)
            .filter_map(move |(name, _)| catalog.get(name).map(|identifier| (name, identifier)))
    }
}

impl<N: Into<String>> FromIterator<(N, bool)> for Selections {
    fn from_iter<T: IntoIterator<Item = (N, bool)>>(iter: T) -> Self {
        let mut selections = Self::default();
        for (name, enabled) in iter {
            selections.set(name, enabled);
        }
        selections
    }
}

impl<'de> Deserialize<'de> for Selections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SelectionsVisitor;

        impl<'de> Visitor<'de> for SelectionsVisitor {
            type Value = Selections;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of model names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Selections, A::Error> {
                let mut selections = Selections::default();
                while let Some((name, enabled)) = map.next_entry::<String, bool>()? {
                    selections.set(name, enabled);
                }
                Ok(selections)
            }
        }

        deserializer.deserialize_map(SelectionsVisitor)
    }
}

/// Per-model outcomes of one comparison, in dispatch order.
#[derive(Debug, Default)]
pub struct ComparisonResult {
    entries: Vec<(String, ModelOutcome)>,
}

impl ComparisonResult {
    pub fn push(&mut self, display_name: impl Into<String>, outcome: ModelOutcome) {
        self.entries.push((display_name.into(), outcome));
    }

    pub fn get(&self, display_name: &str) -> Option<&ModelOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == display_name)
            .map(|(_, outcome)| outcome)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_err()).count()
    }
}

/// Serialized as `{display_name: text}`, with failures as `[Error: ...]`.
impl Serialize for ComparisonResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            match outcome {
                Ok(text) => map.serialize_entry(name, text)?,
                Err(e) => map.serialize_entry(name, &e.to_placeholder())?,
            }
        }
        map.end()
    }
}

#[derive(serde::Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(serde::Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Issues chat completions against the upstream on behalf of the caller.
#[derive(Clone)]
pub struct Comparator {
    client: Client,
    chat_url: String,
    verbosity: LogVerbosity,
}

impl Comparator {
    pub fn new(client: Client, chat_url: impl Into<String>) -> Self {
        Self {
            client,
            chat_url: chat_url.into(),
            verbosity: LogVerbosity::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            create_client(&config.upstream)?,
            config.upstream.chat_completions_url(),
        )
        .with_verbosity(config.app.log_verbosity))
    }

    pub fn with_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Send `prompt` as a single user message to `identifier`.
    pub async fn complete(
        &self,
        user_key: &str,
        identifier: &str,
        prompt: &str,
    ) -> Result<String, LlmBoxError> {
        let request = CompletionRequest {
            model: identifier,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(user_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: Value = response.json().await?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(LlmBoxError::MissingContent)
    }

    /// Query every enabled model the catalog knows, in selection order.
    pub async fn dispatch(
        &self,
        prompt: &str,
        selections: &Selections,
        user_key: &str,
        catalog: &ModelCatalog,
    ) -> ComparisonResult {
        let mut results = ComparisonResult::default();

        for (name, identifier) in selections.resolve(catalog) {
            let start = Instant::now();
            let outcome = self.complete(user_key, identifier, prompt).await;
            let elapsed = start.elapsed();

            let line = format_outcome(name, identifier, elapsed, &outcome, self.verbosity);
            match &outcome {
                Ok(_) => tracing::info!("{}", line),
                Err(_) => tracing::warn!("{}", line),
            }

            results.push(name, outcome);
        }

        results
    }
}
