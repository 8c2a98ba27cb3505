use crate::session::ConversationSession;
use parking_lot::RwLock;
use parley_core::{EngineFactory, ParleyError, ParleyResult, Turn};
use parley_persona::PersonaCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// One store entry: the persona name readable without taking the session
/// lock, plus the mutex that serializes all mutation for this conversation.
pub struct SessionHandle {
    persona_name: String,
    session: tokio::sync::Mutex<ConversationSession>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("persona_name", &self.persona_name)
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// The name of the persona the session was created with.
    pub fn persona_name(&self) -> &str {
        &self.persona_name
    }

    /// Acquires the per-conversation lock.
    ///
    /// Holding the guard across the user-append → engine-invoke →
    /// assistant-append sequence is what makes one conversation's
    /// exchanges atomic with respect to each other. Requests on other
    /// conversations are never blocked by this lock.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ConversationSession> {
        self.session.lock().await
    }
}

/// Process-wide map from conversation id to live session.
///
/// Entries are created lazily on first request and never evicted; an
/// eviction policy is an extension point, not a shipped behavior. The
/// map lock is held only for lookup and insertion — never across an
/// engine, transcription, or synthesis call.
pub struct SessionStore {
    catalog: Arc<PersonaCatalog>,
    engine: Arc<dyn EngineFactory>,
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionStore {
    /// Creates an empty store resolving personas against `catalog` and
    /// opening per-session engine handles through `engine`.
    pub fn new(catalog: Arc<PersonaCatalog>, engine: Arc<dyn EngineFactory>) -> Self {
        Self {
            catalog,
            engine,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the session for `conversation_id`, creating it if absent.
    ///
    /// On creation the persona is resolved through the catalog
    /// (`UnknownPersona` on a miss), the history starts empty, and a
    /// fresh engine handle is opened for the persona's turn template
    /// and bound to the session. An existing session
    /// is returned unmodified when `persona_name` matches its persona;
    /// a mismatch fails with `PersonaConflict` and leaves the session
    /// untouched.
    pub fn get_or_create(
        &self,
        conversation_id: &str,
        persona_name: &str,
    ) -> ParleyResult<Arc<SessionHandle>> {
        if let Some(handle) = self.sessions.read().get(conversation_id) {
            return Self::confirm_persona(conversation_id, persona_name, handle);
        }

        // Resolve before taking the write lock; a catalog miss must not
        // leave a half-created entry behind.
        let persona = self.catalog.lookup(persona_name)?;

        let mut sessions = self.sessions.write();
        // Another request may have created the session between the read
        // and write lock; re-run the conflict check against the winner.
        if let Some(handle) = sessions.get(conversation_id) {
            return Self::confirm_persona(conversation_id, persona_name, handle);
        }

        info!(
            conversation_id = %conversation_id,
            persona = %persona_name,
            "Creating conversation session"
        );
        let engine = self.engine.open(&persona.turn_template);
        let handle = Arc::new(SessionHandle {
            persona_name: persona.name.clone(),
            session: tokio::sync::Mutex::new(ConversationSession::new(
                conversation_id,
                persona,
                engine,
            )),
        });
        sessions.insert(conversation_id.to_string(), handle.clone());
        Ok(handle)
    }

    fn confirm_persona(
        conversation_id: &str,
        persona_name: &str,
        handle: &Arc<SessionHandle>,
    ) -> ParleyResult<Arc<SessionHandle>> {
        if handle.persona_name == persona_name {
            debug!(conversation_id = %conversation_id, "Reusing existing session");
            Ok(handle.clone())
        } else {
            Err(ParleyError::PersonaConflict {
                conversation_id: conversation_id.to_string(),
                existing: handle.persona_name.clone(),
                requested: persona_name.to_string(),
            })
        }
    }

    /// Looks up an existing session without creating one.
    pub fn get(&self, conversation_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.read().get(conversation_id).cloned()
    }

    /// Appends a turn to an existing session.
    ///
    /// Defensive path: the orchestrator appends through the handle it
    /// already holds, so `UnknownSession` here means the caller and the
    /// store disagree on state.
    pub async fn append_turn(&self, conversation_id: &str, turn: Turn) -> ParleyResult<()> {
        let handle = self
            .get(conversation_id)
            .ok_or_else(|| ParleyError::UnknownSession(conversation_id.to_string()))?;
        handle.lock().await.append(turn);
        Ok(())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the store has no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Whether a session exists for `conversation_id`.
    pub fn contains(&self, conversation_id: &str) -> bool {
        self.sessions.read().contains_key(conversation_id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.len())
            .finish()
    }
}
