//! HTTP gateway for the Parley conversation server.
//!
//! Exposes the conversation orchestrator over a small axum surface:
//! `POST /converse` runs one exchange (text or speech, in and out) and
//! `GET /health` reports liveness plus the recognized personas. The
//! orchestrator itself is transport-agnostic and is exercised directly
//! by the integration tests.

mod orchestrator;
mod request;
mod server;

pub use orchestrator::{ConverseReply, Orchestrator};
pub use request::{ConverseRequest, InputPayload, IoMethod};
pub use server::{AppState, GatewayServer};
