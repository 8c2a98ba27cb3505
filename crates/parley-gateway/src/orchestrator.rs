use crate::request::{ConverseRequest, InputPayload, IoMethod};
use parley_core::{ParleyError, ParleyResult, Synthesizer, Transcriber};
use parley_persona::PersonaCatalog;
use parley_session::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// The result of one successful exchange.
#[derive(Debug)]
pub enum ConverseReply {
    /// The assistant utterance as text.
    Text(String),
    /// The assistant utterance synthesized as MP3 bytes.
    Audio(Vec<u8>),
}

/// The conversation orchestrator: validates a request, resolves the
/// session, normalizes speech input, runs the dialogue engine against
/// the full history, and normalizes speech output.
pub struct Orchestrator {
    catalog: Arc<PersonaCatalog>,
    store: Arc<SessionStore>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl Orchestrator {
    /// Creates an orchestrator over the shared store and collaborators.
    pub fn new(
        catalog: Arc<PersonaCatalog>,
        store: Arc<SessionStore>,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            catalog,
            store,
            transcriber,
            synthesizer,
        }
    }

    /// Runs one exchange.
    ///
    /// Validation happens before any session state is touched. Session
    /// creation itself is idempotent state, not a side effect to roll
    /// back: a well-formed id with a valid persona legitimately leaves
    /// an empty session behind even when a later step fails. Turns are
    /// appended only after the call that produced them succeeded, so a
    /// failed transcription or engine call never dirties the history.
    pub async fn handle(&self, request: &ConverseRequest) -> ParleyResult<ConverseReply> {
        let request_id = Uuid::new_v4();
        let input = request.validated_input()?;
        if !self.catalog.contains(&request.persona_name) {
            return Err(ParleyError::UnknownPersona(request.persona_name.clone()));
        }

        let handle = self
            .store
            .get_or_create(&request.conversation_id, &request.persona_name)?;

        // Speech input is normalized to text before the session lock is
        // taken; transcription reads no session state. The raw audio is
        // dropped with `input` regardless of the outcome.
        let user_text = match input {
            InputPayload::Text(text) => text,
            InputPayload::Speech(audio) => self.transcriber.transcribe(&audio).await?,
        };
        let user_text = user_text.trim().to_string();
        if user_text.is_empty() {
            return Err(ParleyError::InvalidRequest("empty input".to_string()));
        }

        info!(
            request_id = %request_id,
            conversation_id = %request.conversation_id,
            persona = %request.persona_name,
            "Running exchange"
        );

        // Engine → append → append under the session lock, so exchanges
        // on one conversation are atomic with respect to each other.
        // Other conversations are untouched by this lock. Appending only
        // after the engine succeeded means a failure needs no rollback.
        let assistant_text = {
            let mut session = handle.lock().await;
            let engine = session.engine().clone();
            let system_instruction = session.persona().system_instruction.clone();
            let reply = engine
                .generate_reply(&system_instruction, session.history(), &user_text)
                .await
                .inspect_err(|e| {
                    warn!(
                        request_id = %request_id,
                        conversation_id = %request.conversation_id,
                        error = %e,
                        "Engine call failed"
                    );
                })?;
            session.push_user(&user_text);
            session.push_assistant(&reply);
            reply
        };

        match request.output_method {
            IoMethod::Speech => {
                let audio = self.synthesizer.synthesize(&assistant_text).await?;
                Ok(ConverseReply::Audio(audio))
            }
            IoMethod::Text => Ok(ConverseReply::Text(assistant_text)),
        }
    }
}
