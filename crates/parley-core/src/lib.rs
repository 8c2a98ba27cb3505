//! Core types and error definitions for the Parley conversation server.
//!
//! This crate provides the foundational types shared across all Parley
//! crates: the error taxonomy, the conversation turn representation, and
//! the capability traits for the external collaborators (speech-to-text,
//! dialogue generation, speech synthesis).
//!
//! # Main types
//!
//! - [`ParleyError`] — Unified error enum for all Parley subsystems.
//! - [`ParleyResult`] — Convenience alias for `Result<T, ParleyError>`.
//! - [`Role`] — Turn author (user or assistant).
//! - [`Turn`] — A single utterance within a conversation.
//! - [`TemplateSegment`] — One slot in a persona's turn template.
//! - [`DialogueEngine`] / [`Transcriber`] / [`Synthesizer`] — Capability
//!   traits implemented by the collaborator crates.
//! - [`EngineFactory`] — Opens per-session [`DialogueEngine`] handles.

mod capability;
mod error;
mod template;
mod turn;

pub use capability::{DialogueEngine, EngineFactory, Synthesizer, Transcriber};
pub use error::{ParleyError, ParleyResult};
pub use template::TemplateSegment;
pub use turn::{Role, Turn};
