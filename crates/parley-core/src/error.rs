use thiserror::Error;

/// A convenience `Result` alias using [`ParleyError`].
pub type ParleyResult<T> = Result<T, ParleyError>;

/// Top-level error type for the Parley conversation server.
///
/// The first four variants are caller errors and map to 4xx responses at
/// the gateway; the collaborator variants map to 5xx with a generic body.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// A malformed, missing, or inconsistent request field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested persona does not exist in the catalog.
    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    /// An attempt to change the persona of an established conversation.
    #[error("conversation {conversation_id} is bound to persona {existing:?}, refusing switch to {requested:?}")]
    PersonaConflict {
        /// The conversation whose persona was challenged.
        conversation_id: String,
        /// The persona the session was created with.
        existing: String,
        /// The persona named by the offending request.
        requested: String,
    },

    /// Internal consistency violation: the orchestrator and the session
    /// store disagree on which sessions exist. Should be unreachable.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// The speech-to-text collaborator failed.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The dialogue-generation collaborator failed.
    #[error("dialogue engine failed: {0}")]
    Engine(String),

    /// The speech-synthesis collaborator failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// An error in configuration parsing or validation.
    #[error("config error: {0}")]
    Config(String),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParleyError {
    /// Whether this error is the caller's fault (4xx-equivalent) rather
    /// than a collaborator or internal failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::UnknownPersona(_) | Self::PersonaConflict { .. }
        )
    }
}
