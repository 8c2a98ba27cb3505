use chrono::{DateTime, Utc};
use parley_core::{DialogueEngine, Turn};
use parley_persona::PersonaSpec;
use std::sync::Arc;

/// A live conversation: a persona fixed at creation, an append-only turn
/// history, and the dialogue-engine handle allocated for this session.
///
/// Sessions are volatile: they live in the [`SessionStore`](crate::SessionStore)
/// for the duration of the process and are never persisted.
pub struct ConversationSession {
    conversation_id: String,
    persona: Arc<PersonaSpec>,
    history: Vec<Turn>,
    engine: Arc<dyn DialogueEngine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates an empty session bound to the given persona and engine.
    pub fn new(
        conversation_id: impl Into<String>,
        persona: Arc<PersonaSpec>,
        engine: Arc<dyn DialogueEngine>,
    ) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: conversation_id.into(),
            persona,
            history: Vec::new(),
            engine,
            created_at: now,
            updated_at: now,
        }
    }

    /// The caller-supplied conversation id.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// The persona this conversation was created with. Immutable.
    pub fn persona(&self) -> &Arc<PersonaSpec> {
        &self.persona
    }

    /// The dialogue-engine handle owned by this session.
    pub fn engine(&self) -> &Arc<dyn DialogueEngine> {
        &self.engine
    }

    /// The ordered turn history. Insertion order is conversational order.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Number of turns appended so far.
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the last turn was appended (creation time if none).
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Appends a turn. History only ever grows; turns are immutable once
    /// appended. Alternation is not enforced here — normal flow alternates,
    /// but consecutive same-role turns are legal if a caller produces them.
    pub fn append(&mut self, turn: Turn) {
        self.updated_at = turn.timestamp;
        self.history.push(turn);
    }

    /// Appends a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.append(Turn::user(text));
    }

    /// Appends an assistant turn.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.append(Turn::assistant(text));
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("conversation_id", &self.conversation_id)
            .field("persona", &self.persona.name)
            .field("turns", &self.history.len())
            .finish()
    }
}
