use async_trait::async_trait;
use parley_core::{ParleyError, ParleyResult, Synthesizer};
use serde::Deserialize;
use tracing::debug;

/// Configuration for the text-to-speech adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// Synthesis endpoint returning MP3 bytes.
    #[serde(default = "default_tts_url")]
    pub url: String,
    /// Voice identifier, when the server supports one.
    #[serde(default)]
    pub voice: Option<String>,
    /// Synthesis language.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_tts_url() -> String {
    "http://localhost:2003/speak".to_string()
}
fn default_language() -> String {
    "en".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            voice: None,
            language: default_language(),
        }
    }
}

/// Synthesizer backed by an HTTP TTS server.
///
/// Posts the text as JSON and reads the MP3 payload from the response
/// body. The payload stays in memory; it belongs to the one response
/// being produced and is dropped with it.
pub struct HttpSynthesizer {
    config: TtsConfig,
    http: reqwest::Client,
}

impl HttpSynthesizer {
    /// Creates a synthesizer for the configured endpoint.
    pub fn new(config: TtsConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> ParleyResult<Vec<u8>> {
        let body = serde_json::json!({
            "text": text,
            "voice": self.config.voice,
            "language": self.config.language,
        });

        debug!(chars = text.len(), "Requesting speech synthesis");

        let resp = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ParleyError::Synthesis(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ParleyError::Synthesis(format!(
                "TTS API error {status}: {error_body}"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ParleyError::Synthesis(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ParleyError::Synthesis("empty audio payload".to_string()));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_maps_to_synthesis_error() {
        let synthesizer = HttpSynthesizer::new(TtsConfig {
            url: "http://127.0.0.1:1/speak".to_string(),
            ..TtsConfig::default()
        });
        let err = synthesizer.synthesize("hello").await.unwrap_err();
        assert!(matches!(err, ParleyError::Synthesis(_)));
    }
}
