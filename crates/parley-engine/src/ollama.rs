use crate::prompt::build_messages;
use async_trait::async_trait;
use parley_core::{
    DialogueEngine, EngineFactory, ParleyError, ParleyResult, TemplateSegment, Turn,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Configuration for the chat-completions dialogue backend.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the OpenAI-compatible API, e.g. `http://localhost:11434`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens per generated reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "orca-mini".to_string()
}
fn default_max_tokens() -> u32 {
    512
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Dialogue-engine factory backed by an OpenAI-compatible chat
/// completions API.
///
/// Works with Ollama, OpenAI, OpenRouter, Groq, and any other provider
/// implementing the same surface. [`open`](EngineFactory::open) yields a
/// per-session handle whose prompts follow the persona's turn template;
/// the handle is stateless over HTTP, so the cumulative conversation
/// context is rebuilt from the full session history on every call.
pub struct OllamaEngine {
    config: EngineConfig,
    http: reqwest::Client,
}

impl OllamaEngine {
    /// Creates a factory for the configured endpoint. The underlying
    /// HTTP client is shared by every handle it opens.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

impl EngineFactory for OllamaEngine {
    fn open(&self, template: &[TemplateSegment]) -> Arc<dyn DialogueEngine> {
        Arc::new(OllamaHandle {
            config: self.config.clone(),
            template: template.to_vec(),
            http: self.http.clone(),
        })
    }
}

/// One session's engine handle: the shared client plus the prompt
/// template it was opened with.
struct OllamaHandle {
    config: EngineConfig,
    template: Vec<TemplateSegment>,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl DialogueEngine for OllamaHandle {
    async fn generate_reply(
        &self,
        system_instruction: &str,
        history: &[Turn],
        user_text: &str,
    ) -> ParleyResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let messages = build_messages(&self.template, system_instruction, history, user_text);

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        });

        debug!(
            model = %self.config.model,
            history_len = history.len(),
            "Requesting chat completion"
        );

        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ParleyError::Engine(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ParleyError::Engine(format!(
                "chat API error {status}: {error_body}"
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ParleyError::Engine(format!("malformed chat response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ParleyError::Engine("empty completion".to_string()));
        }
        Ok(content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const STANDARD: [TemplateSegment; 3] = [
        TemplateSegment::SystemInstruction,
        TemplateSegment::History,
        TemplateSegment::UserUtterance,
    ];

    #[test]
    fn config_defaults_point_at_local_ollama() {
        let config = EngineConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "orca-mini");
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: EngineConfig = serde_json::from_str(r#"{"model": "llama3"}"#).unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.base_url, "http://localhost:11434");
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_engine_error() {
        // Non-routable port: the client fails fast with a connect error.
        let factory = OllamaEngine::new(EngineConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..EngineConfig::default()
        });
        let err = factory
            .open(&STANDARD)
            .generate_reply("sys", &[], "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ParleyError::Engine(_)));
    }
}
