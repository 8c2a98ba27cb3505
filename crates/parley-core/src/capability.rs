use crate::{ParleyResult, TemplateSegment, Turn};
use async_trait::async_trait;
use std::sync::Arc;

/// Speech-to-text collaborator.
///
/// The payload is consumed for the duration of the call only; callers
/// must not retain the raw audio after transcription, success or failure.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Converts a raw audio payload into text.
    ///
    /// Fails with [`ParleyError::Transcription`](crate::ParleyError::Transcription).
    async fn transcribe(&self, audio: &[u8]) -> ParleyResult<String>;
}

/// Text-to-speech collaborator.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Renders text as an MP3 audio payload.
    ///
    /// Fails with [`ParleyError::Synthesis`](crate::ParleyError::Synthesis).
    async fn synthesize(&self, text: &str) -> ParleyResult<Vec<u8>>;
}

/// Dialogue-generation collaborator.
///
/// Each call receives the complete ordered history of the conversation;
/// the engine must observe every prior turn. Any context windowing is the
/// engine's own concern, never imposed here.
#[async_trait]
pub trait DialogueEngine: Send + Sync {
    /// Produces the next assistant utterance.
    ///
    /// Fails with [`ParleyError::Engine`](crate::ParleyError::Engine).
    async fn generate_reply(
        &self,
        system_instruction: &str,
        history: &[Turn],
        user_text: &str,
    ) -> ParleyResult<String>;
}

/// Allocator of dialogue-engine handles.
///
/// The session store opens one handle per conversation at creation
/// time, shaped by the persona's turn template; the handle is owned by
/// that session for its lifetime. How the template drives prompt
/// assembly is the engine's concern.
pub trait EngineFactory: Send + Sync {
    /// Opens a fresh engine handle whose prompts follow `template`.
    fn open(&self, template: &[TemplateSegment]) -> Arc<dyn DialogueEngine>;
}
