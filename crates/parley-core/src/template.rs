use serde::{Deserialize, Serialize};

/// One slot in a persona's turn template.
///
/// The segments describe, in order, how a prompt for the dialogue engine
/// is assembled from the persona and the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSegment {
    /// The persona's fixed system instruction.
    SystemInstruction,
    /// The conversation's ordered turn history.
    History,
    /// The new user utterance being answered.
    UserUtterance,
}
