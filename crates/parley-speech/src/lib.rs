//! Speech adapters for the Parley conversation server.
//!
//! Two boundary shims around external speech collaborators: a
//! [`Transcriber`](parley_core::Transcriber) that sends audio to a
//! Whisper-compatible server (or a local whisper CLI), and a
//! [`Synthesizer`](parley_core::Synthesizer) that renders text as MP3
//! over HTTP. Audio payloads are per-request and transient; anything
//! spilled to disk is removed when the request ends, success or failure.

mod spill;
mod stt;
mod tts;

pub use spill::AudioSpill;
pub use stt::{HttpTranscriber, SttConfig, WhisperCliTranscriber};
pub use tts::{HttpSynthesizer, TtsConfig};
