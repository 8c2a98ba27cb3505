//! Dialogue-engine backend for the Parley conversation server.
//!
//! Talks to an OpenAI-compatible chat completions API. Ollama exposes
//! one, so the default deployment runs a local Ollama with a small
//! conversational model; any compatible provider works.

mod ollama;
mod prompt;

pub use ollama::{EngineConfig, OllamaEngine};
pub use prompt::build_messages;
