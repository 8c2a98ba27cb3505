use crate::spill::AudioSpill;
use async_trait::async_trait;
use parley_core::{ParleyError, ParleyResult, Transcriber};
use serde::Deserialize;
use tracing::debug;

/// Configuration for the speech-to-text adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct SttConfig {
    /// Transcription endpoint, e.g. a local whisper server.
    #[serde(default = "default_stt_url")]
    pub url: String,
    /// Model name passed to the server.
    #[serde(default = "default_stt_model")]
    pub model: String,
    /// Transcription language hint.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_stt_url() -> String {
    "http://localhost:2022/v1/audio/transcriptions".to_string()
}
fn default_stt_model() -> String {
    "whisper-base".to_string()
}
fn default_language() -> String {
    "en".to_string()
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            url: default_stt_url(),
            model: default_stt_model(),
            language: default_language(),
        }
    }
}

/// Transcriber backed by a Whisper-compatible HTTP server.
///
/// Uploads the payload as multipart form data and reads the JSON
/// `{"text": ...}` body back. The payload is consumed by the upload and
/// never retained.
pub struct HttpTranscriber {
    config: SttConfig,
    http: reqwest::Client,
}

impl HttpTranscriber {
    /// Creates a transcriber for the configured endpoint.
    pub fn new(config: SttConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> ParleyResult<String> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| ParleyError::Transcription(format!("mime error: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone())
            .text("response_format", "json");

        debug!(bytes = audio.len(), "Uploading audio for transcription");

        let resp = self
            .http
            .post(&self.config.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ParleyError::Transcription(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ParleyError::Transcription(format!(
                "transcription API error {status}: {error_body}"
            )));
        }

        let parsed: TranscriptionResponse = resp
            .json()
            .await
            .map_err(|e| ParleyError::Transcription(format!("malformed response: {e}")))?;
        Ok(parsed.text)
    }
}

/// Transcriber that shells out to a local whisper CLI.
///
/// The payload is spilled to a temp file for the child process and
/// removed when the call returns, success or failure.
pub struct WhisperCliTranscriber {
    command: String,
    model: String,
}

impl WhisperCliTranscriber {
    /// Creates a transcriber invoking `command` with `-m model -f <file>`.
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> ParleyResult<String> {
        let spill = AudioSpill::write(audio)?;

        let output = tokio::process::Command::new(&self.command)
            .arg("-m")
            .arg(&self.model)
            .arg("-f")
            .arg(spill.path())
            .arg("--no-timestamps")
            .output()
            .await
            .map_err(|e| {
                ParleyError::Transcription(format!("failed to run {}: {e}", self.command))
            })?;
        // spill drops here whatever the child reported

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParleyError::Transcription(format!(
                "{} exited with {}: {stderr}",
                self.command, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
