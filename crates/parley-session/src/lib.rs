//! Session management for the Parley conversation server.
//!
//! The [`SessionStore`] is the single shared mutable resource in the
//! system: it maps caller-supplied conversation ids to live sessions,
//! creates sessions lazily, rejects persona switches on established
//! conversations, and serializes all mutation per conversation while
//! letting distinct conversations proceed concurrently.

mod session;
mod store;

pub use session::ConversationSession;
pub use store::{SessionHandle, SessionStore};
