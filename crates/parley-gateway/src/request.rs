use base64::Engine as _;
use parley_core::{ParleyError, ParleyResult};
use serde::{Deserialize, Serialize};

/// How a request's input arrives or its output should be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoMethod {
    /// Audio in, or synthesized speech out.
    Speech,
    /// Plain text.
    #[default]
    Text,
}

/// One conversation exchange request.
///
/// The logical shape is transport-agnostic; over JSON the audio payload
/// travels base64-encoded in `audio_base64`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConverseRequest {
    /// Caller-supplied opaque key scoping the dialogue.
    #[serde(default)]
    pub conversation_id: String,
    /// Catalog name of the persona to converse with.
    #[serde(default)]
    pub persona_name: String,
    /// How the input is supplied.
    #[serde(default)]
    pub input_method: IoMethod,
    /// How the reply should be delivered.
    #[serde(default)]
    pub output_method: IoMethod,
    /// The typed utterance. Required iff `input_method` is `Text`.
    #[serde(default)]
    pub text_input: Option<String>,
    /// Base64 audio payload. Required iff `input_method` is `Speech`.
    #[serde(default)]
    pub audio_base64: Option<String>,
}

/// The decoded input of a validated request.
#[derive(Debug)]
pub enum InputPayload {
    /// A typed utterance, not yet trimmed.
    Text(String),
    /// Raw audio bytes awaiting transcription.
    Speech(Vec<u8>),
}

impl ConverseRequest {
    /// Runs the field-level validation, first failure wins:
    /// a present conversation id, then exactly one input consistent
    /// with `input_method`. Persona existence is checked by the
    /// orchestrator against the catalog.
    pub fn validated_input(&self) -> ParleyResult<InputPayload> {
        if self.conversation_id.trim().is_empty() {
            return Err(ParleyError::InvalidRequest(
                "missing conversation id".to_string(),
            ));
        }

        match self.input_method {
            IoMethod::Speech => match (&self.audio_base64, &self.text_input) {
                (Some(audio), None) => {
                    let bytes = base64::engine::general_purpose::STANDARD
                        .decode(audio)
                        .map_err(|_| {
                            ParleyError::InvalidRequest("invalid audio payload".to_string())
                        })?;
                    if bytes.is_empty() {
                        return Err(ParleyError::InvalidRequest(
                            "missing or inconsistent input".to_string(),
                        ));
                    }
                    Ok(InputPayload::Speech(bytes))
                }
                _ => Err(ParleyError::InvalidRequest(
                    "missing or inconsistent input".to_string(),
                )),
            },
            IoMethod::Text => match (&self.text_input, &self.audio_base64) {
                (Some(text), None) => Ok(InputPayload::Text(text.clone())),
                _ => Err(ParleyError::InvalidRequest(
                    "missing or inconsistent input".to_string(),
                )),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn text_request() -> ConverseRequest {
        ConverseRequest {
            conversation_id: "c1".to_string(),
            persona_name: "Talking to your co-worker".to_string(),
            input_method: IoMethod::Text,
            output_method: IoMethod::Text,
            text_input: Some("Hello!".to_string()),
            audio_base64: None,
        }
    }

    #[test]
    fn valid_text_request_passes() {
        let input = text_request().validated_input().unwrap();
        assert!(matches!(input, InputPayload::Text(t) if t == "Hello!"));
    }

    #[test]
    fn missing_conversation_id_fails_first() {
        // Broken in two ways; the id check must win.
        let req = ConverseRequest {
            conversation_id: "  ".to_string(),
            text_input: None,
            ..text_request()
        };
        let err = req.validated_input().unwrap_err();
        assert!(matches!(err, ParleyError::InvalidRequest(m) if m == "missing conversation id"));
    }

    #[test]
    fn speech_without_audio_fails() {
        let req = ConverseRequest {
            input_method: IoMethod::Speech,
            text_input: None,
            audio_base64: None,
            ..text_request()
        };
        let err = req.validated_input().unwrap_err();
        assert!(
            matches!(err, ParleyError::InvalidRequest(m) if m == "missing or inconsistent input")
        );
    }

    #[test]
    fn speech_with_text_instead_of_audio_fails() {
        let req = ConverseRequest {
            input_method: IoMethod::Speech,
            ..text_request()
        };
        assert!(req.validated_input().is_err());
    }

    #[test]
    fn text_with_both_inputs_fails() {
        let req = ConverseRequest {
            audio_base64: Some("AAAA".to_string()),
            ..text_request()
        };
        assert!(req.validated_input().is_err());
    }

    #[test]
    fn speech_audio_is_decoded() {
        let req = ConverseRequest {
            input_method: IoMethod::Speech,
            text_input: None,
            audio_base64: Some(base64::engine::general_purpose::STANDARD.encode(b"RIFF")),
            ..text_request()
        };
        let input = req.validated_input().unwrap();
        assert!(matches!(input, InputPayload::Speech(b) if b == b"RIFF"));
    }

    #[test]
    fn garbage_base64_fails() {
        let req = ConverseRequest {
            input_method: IoMethod::Speech,
            text_input: None,
            audio_base64: Some("%%% not base64 %%%".to_string()),
            ..text_request()
        };
        let err = req.validated_input().unwrap_err();
        assert!(matches!(err, ParleyError::InvalidRequest(m) if m == "invalid audio payload"));
    }

    #[test]
    fn io_method_uses_wire_strings() {
        let req: ConverseRequest = serde_json::from_str(
            r#"{"conversation_id":"c1","persona_name":"p","input_method":"Speech","output_method":"Text"}"#,
        )
        .unwrap();
        assert_eq!(req.input_method, IoMethod::Speech);
        assert_eq!(req.output_method, IoMethod::Text);
    }

    #[test]
    fn io_method_defaults_to_text() {
        let req: ConverseRequest =
            serde_json::from_str(r#"{"conversation_id":"c1","persona_name":"p"}"#).unwrap();
        assert_eq!(req.input_method, IoMethod::Text);
        assert_eq!(req.output_method, IoMethod::Text);
    }
}
