//! Mood summaries from a hosted text-generation model.
//!
//! Not part of the journal data path: nothing here reads or writes the
//! store. Callers build a prompt from entries and await the summary.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::catalog::activity_name;
use crate::error::{CoreError, SummaryError, ValidationError};
use crate::journal::{CustomActivity, JournalEntry};
use crate::storage::SummaryConfig;
use crate::timestamp;

const SYSTEM_PROMPT: &str = "You are a mood tracking assistant.";

/// Thin wrapper around the OS keyring for provider API keys.
pub mod keyring_store {
    const SERVICE: &str = "moodjournal";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryProvider {
    OpenAi,
    HuggingFace,
}

impl SummaryProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            SummaryProvider::OpenAi => "OpenAI",
            SummaryProvider::HuggingFace => "Hugging Face",
        }
    }

    /// Keyring entry holding the API key.
    pub fn keyring_key(&self) -> &'static str {
        match self {
            SummaryProvider::OpenAi => "openai_api_key",
            SummaryProvider::HuggingFace => "huggingface_api_key",
        }
    }

    /// Environment variable consulted when the keyring has no key.
    pub fn env_var(&self) -> &'static str {
        match self {
            SummaryProvider::OpenAi => "OPENAI_API_KEY",
            SummaryProvider::HuggingFace => "HF_API_KEY",
        }
    }
}

impl fmt::Display for SummaryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SummaryProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(SummaryProvider::OpenAi),
            "huggingface" | "hf" => Ok(SummaryProvider::HuggingFace),
            other => Err(ValidationError::InvalidValue {
                field: "summary.provider".into(),
                message: format!("unknown provider '{other}'"),
            }),
        }
    }
}

/// Look up the provider's API key: keyring first, then the environment.
pub fn api_key(provider: SummaryProvider) -> Result<String, SummaryError> {
    match keyring_store::get(provider.keyring_key()) {
        Ok(Some(key)) if !key.is_empty() => return Ok(key),
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "keyring unavailable; trying environment"),
    }
    std::env::var(provider.env_var())
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| SummaryError::MissingApiKey {
            provider: provider.display_name().into(),
        })
}

pub struct SummaryClient {
    http: reqwest::Client,
    provider: SummaryProvider,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl SummaryClient {
    /// Client for the configured provider, with its key from the keyring
    /// or environment.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, CoreError> {
        let provider: SummaryProvider = config.provider.parse()?;
        let key = api_key(provider)?;
        Ok(Self::new(provider, key, config))
    }

    pub fn new(provider: SummaryProvider, api_key: impl Into<String>, config: &SummaryConfig) -> Self {
        let (base_url, model) = match provider {
            SummaryProvider::OpenAi => (&config.openai_base_url, &config.openai_model),
            SummaryProvider::HuggingFace => (&config.huggingface_base_url, &config.huggingface_model),
        };
        Self {
            http: reqwest::Client::new(),
            provider,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn provider(&self) -> SummaryProvider {
        self.provider
    }

    fn endpoint(&self) -> String {
        match self.provider {
            SummaryProvider::OpenAi => format!("{}/v1/chat/completions", self.base_url),
            SummaryProvider::HuggingFace => format!("{}/models/{}", self.base_url, self.model),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        match self.provider {
            SummaryProvider::OpenAi => json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": prompt },
                ],
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
            }),
            SummaryProvider::HuggingFace => json!({
                "inputs": prompt,
                "parameters": {
                    "max_new_tokens": self.max_tokens,
                    "temperature": self.temperature,
                    "return_full_text": false,
                },
            }),
        }
    }

    /// Send `prompt` and return the trimmed generated text.
    ///
    /// # Errors
    /// Transport failures, bodies that are not JSON, non-success statuses
    /// (carrying the provider's message) and responses without text.
    pub async fn summarize(&self, prompt: &str) -> Result<String, SummaryError> {
        let provider = self.provider.display_name().to_string();
        tracing::debug!(provider = %provider, model = %self.model, "requesting summary");

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|source| SummaryError::Http {
                provider: provider.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| SummaryError::Http {
            provider: provider.clone(),
            source,
        })?;
        let data: Value = serde_json::from_str(&text).map_err(|e| SummaryError::InvalidResponse {
            provider: provider.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let detail = match self.provider {
                SummaryProvider::OpenAi => data.pointer("/error/message").and_then(Value::as_str),
                SummaryProvider::HuggingFace => data.get("error").and_then(Value::as_str),
            };
            let message = detail
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::warn!(provider = %provider, status = status.as_u16(), "summary request rejected");
            return Err(SummaryError::Api { provider, message });
        }

        let generated = match self.provider {
            SummaryProvider::OpenAi => data.pointer("/choices/0/message/content"),
            SummaryProvider::HuggingFace => data.pointer("/0/generated_text"),
        };
        match generated.and_then(Value::as_str).map(str::trim) {
            Some(summary) if !summary.is_empty() => Ok(summary.to_string()),
            _ => Err(SummaryError::Empty { provider }),
        }
    }
}

/// Render the `limit` most recent entries as a summary prompt. Notes on
/// private entries are left out.
pub fn build_summary_prompt(
    entries: &[JournalEntry],
    custom: &[CustomActivity],
    limit: usize,
) -> String {
    let mut recent: Vec<&JournalEntry> = entries.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(limit);
    recent.reverse();

    let mut prompt = format!(
        "Here are my last {} mood journal entries. Summarize how my mood has been, \
         point out any patterns with activities, and offer one gentle suggestion.\n",
        recent.len()
    );
    for entry in recent {
        let moods = if entry.moods.is_empty() {
            entry.mood.clone()
        } else {
            entry
                .moods
                .iter()
                .map(|m| format!("{} ({}/5)", m.mood, m.intensity))
                .collect::<Vec<_>>()
                .join(", ")
        };
        prompt.push_str(&format!("- {}: {moods}", timestamp::day_prefix(&entry.date)));

        if !entry.activities().is_empty() {
            let names: Vec<&str> = entry
                .activities()
                .iter()
                .map(|a| activity_name(a, custom))
                .collect();
            prompt.push_str(&format!("; activities: {}", names.join(", ")));
        }
        if let Some(note) = entry.note.as_deref().filter(|_| !entry.is_private()) {
            prompt.push_str(&format!("; note: {}", note.trim()));
        }
        prompt.push('\n');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SummaryConfig {
        SummaryConfig {
            openai_base_url: base_url.to_string(),
            huggingface_base_url: base_url.to_string(),
            ..SummaryConfig::default()
        }
    }

    #[test]
    fn provider_parsing() {
        assert_eq!("OpenAI".parse::<SummaryProvider>().unwrap(), SummaryProvider::OpenAi);
        assert_eq!("hf".parse::<SummaryProvider>().unwrap(), SummaryProvider::HuggingFace);
        assert!("claude".parse::<SummaryProvider>().is_err());
    }

    #[tokio::test]
    async fn openai_summary_is_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 300,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"  Mostly calm.  "}}]}"#)
            .create_async()
            .await;

        let client = SummaryClient::new(SummaryProvider::OpenAi, "test-key", &config(&server.url()));
        let summary = client.summarize("how am I").await.unwrap();
        assert_eq!(summary, "Mostly calm.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn openai_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let client = SummaryClient::new(SummaryProvider::OpenAi, "bad", &config(&server.url()));
        let err = client.summarize("x").await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI error: Incorrect API key provided");
    }

    #[tokio::test]
    async fn huggingface_posts_to_model_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/mistralai/Mixtral-8x7B-Instruct-v0.1")
            .match_body(mockito::Matcher::PartialJson(json!({
                "parameters": { "return_full_text": false }
            })))
            .with_status(200)
            .with_body(r#"[{"generated_text":"A good week."}]"#)
            .create_async()
            .await;

        let client =
            SummaryClient::new(SummaryProvider::HuggingFace, "hf-key", &config(&server.url()));
        assert_eq!(client.summarize("x").await.unwrap(), "A good week.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_text_and_bad_json_are_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;
        let client = SummaryClient::new(SummaryProvider::OpenAi, "k", &config(&server.url()));
        let err = client.summarize("x").await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI error: No summary returned.");

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/mistralai/Mixtral-8x7B-Instruct-v0.1")
            .with_status(503)
            .with_body("<html>busy</html>")
            .create_async()
            .await;
        let client = SummaryClient::new(SummaryProvider::HuggingFace, "k", &config(&server.url()));
        assert!(matches!(
            client.summarize("x").await,
            Err(SummaryError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn prompt_lists_recent_entries_oldest_first() {
        let mut older = JournalEntry::new("Sad", 2);
        older.date = "2024-01-01T09:00:00.000Z".into();
        older.note = Some("rough day".into());
        older.is_private = Some(true);
        let mut newer = JournalEntry::new("Happy", 4);
        newer.date = "2024-01-02T09:00:00.000Z".into();
        newer.activities = Some(vec!["yoga".into()]);
        newer.note = Some("great class".into());
        let mut oldest = JournalEntry::new("Calm", 3);
        oldest.date = "2023-12-31T09:00:00.000Z".into();

        let prompt = build_summary_prompt(&[newer, oldest, older], &[], 2);
        let lines: Vec<&str> = prompt.lines().skip(1).collect();
        assert_eq!(
            lines,
            [
                "- 2024-01-01: Sad (2/5)",
                "- 2024-01-02: Happy (4/5); activities: Yoga; note: great class",
            ]
        );
        assert!(prompt.starts_with("Here are my last 2 mood journal entries."));
    }
}
