//! Persona catalog for the Parley conversation server.
//!
//! A persona fixes the assistant's character for a conversation: a system
//! instruction plus the ordered template shape used to assemble each
//! engine prompt. The catalog is built once at startup and is read-only
//! afterwards; sessions hold `Arc` references into it for their lifetime.

use parley_core::{ParleyError, ParleyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub use parley_core::TemplateSegment;

/// An immutable persona specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSpec {
    /// Unique catalog key, human-readable scenario name.
    pub name: String,
    /// The system instruction fixing the assistant's character.
    pub system_instruction: String,
    /// Ordered template shape for engine prompts. Config entries may
    /// omit this and get the standard three-slot shape.
    #[serde(default = "standard_template")]
    pub turn_template: Vec<TemplateSegment>,
}

fn standard_template() -> Vec<TemplateSegment> {
    vec![
        TemplateSegment::SystemInstruction,
        TemplateSegment::History,
        TemplateSegment::UserUtterance,
    ]
}

impl PersonaSpec {
    /// Creates a persona with the standard three-slot template:
    /// system instruction, then history, then the new user utterance.
    pub fn new(name: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_instruction: system_instruction.into(),
            turn_template: standard_template(),
        }
    }
}

/// Read-only registry mapping scenario names to persona specifications.
///
/// Constructed once at startup, shared process-wide behind an `Arc`,
/// never mutated afterwards.
#[derive(Debug, Default)]
pub struct PersonaCatalog {
    personas: HashMap<String, Arc<PersonaSpec>>,
}

impl PersonaCatalog {
    /// Builds a catalog from an explicit list of persona specs.
    ///
    /// Later entries with a duplicate name replace earlier ones, so
    /// config-supplied personas can override the builtin set.
    pub fn new(specs: impl IntoIterator<Item = PersonaSpec>) -> Self {
        let personas = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), Arc::new(spec)))
            .collect();
        Self { personas }
    }

    /// The builtin conversation scenarios.
    pub fn builtin() -> Self {
        Self::new([
            PersonaSpec::new(
                "Small talk between two strangers at a bus stand",
                "You are 'Sam', a business analyst on your way to work on a cloudy day. \
                 You enjoy a good cup of coffee.",
            ),
            PersonaSpec::new(
                "Talking to your co-worker",
                "You are 'John', working in the IT sector. You enjoy reading books and \
                 watching movies, but today you're feeling exhausted from work.",
            ),
            PersonaSpec::new(
                "Conversing with a person in a professional networking event",
                "You are a professional attending a networking event, engaging in \
                 conversations with other professionals.",
            ),
        ])
    }

    /// Builds the builtin catalog extended (or overridden) by extra specs.
    pub fn builtin_with(extra: impl IntoIterator<Item = PersonaSpec>) -> Self {
        let mut catalog = Self::builtin();
        for spec in extra {
            catalog.personas.insert(spec.name.clone(), Arc::new(spec));
        }
        catalog
    }

    /// Resolves a persona by scenario name.
    pub fn lookup(&self, name: &str) -> ParleyResult<Arc<PersonaSpec>> {
        self.personas
            .get(name)
            .cloned()
            .ok_or_else(|| ParleyError::UnknownPersona(name.to_string()))
    }

    /// Whether the catalog contains the named persona.
    pub fn contains(&self, name: &str) -> bool {
        self.personas.contains_key(name)
    }

    /// All recognized scenario names, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.personas.keys().cloned().collect();
        names.sort();
        names
    }
}
