//! Prompt Store: the four named system templates the interview runs on,
//! loaded once at startup from a human-editable YAML file.
//!
//! Templates use `{name}` placeholders. Rendering substitutes only the
//! variables a request supplies; every other brace is left alone, so a
//! template may embed literal JSON without escaping.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::ChatMessage;

pub mod instructions;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read prompt file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid prompt configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Identifies one of the four configured templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    QuestionGeneration,
    ReferenceAnswer,
    ResponseAnalysis,
    Scoring,
}

impl PromptKind {
    pub const ALL: [PromptKind; 4] = [
        PromptKind::QuestionGeneration,
        PromptKind::ReferenceAnswer,
        PromptKind::ResponseAnalysis,
        PromptKind::Scoring,
    ];

    /// Key of this template in the YAML file.
    pub fn config_key(self) -> &'static str {
        match self {
            PromptKind::QuestionGeneration => "prompt_bot",
            PromptKind::ReferenceAnswer => "answer_bot",
            PromptKind::ResponseAnalysis => "prompt_analysis",
            PromptKind::Scoring => "prompt_score",
        }
    }

    /// Placeholders the orchestrator fills for this template.
    pub fn expected_placeholders(self) -> &'static [&'static str] {
        match self {
            PromptKind::QuestionGeneration => &[
                "experience_level",
                "experience_years",
                "desired_positions",
                "tech_stack",
                "key_technologies",
            ],
            PromptKind::ReferenceAnswer | PromptKind::ResponseAnalysis => &[],
            PromptKind::Scoring => &["question", "correct_answer"],
        }
    }
}

/// All four templates are required; serde rejects a file missing any of them.
#[derive(Debug, Clone, Deserialize)]
struct PromptFile {
    prompt_bot: String,
    answer_bot: String,
    prompt_analysis: String,
    prompt_score: String,
}

#[derive(Debug, Clone)]
pub struct PromptStore {
    templates: PromptFile,
}

impl PromptStore {
    pub fn load(path: &Path) -> Result<Self, PromptError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_yaml_str(&raw)?;
        info!("Loaded {} prompt templates from {}", PromptKind::ALL.len(), path.display());
        Ok(store)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, PromptError> {
        let templates: PromptFile = serde_yaml::from_str(raw)?;
        let store = Self { templates };

        for kind in PromptKind::ALL {
            let template = store.template(kind);
            for name in kind.expected_placeholders() {
                if !template.contains(&format!("{{{name}}}")) {
                    warn!(
                        "Prompt '{}' has no {{{}}} placeholder; that value will not reach the model",
                        kind.config_key(),
                        name
                    );
                }
            }
        }

        Ok(store)
    }

    pub fn template(&self, kind: PromptKind) -> &str {
        match kind {
            PromptKind::QuestionGeneration => &self.templates.prompt_bot,
            PromptKind::ReferenceAnswer => &self.templates.answer_bot,
            PromptKind::ResponseAnalysis => &self.templates.prompt_analysis,
            PromptKind::Scoring => &self.templates.prompt_score,
        }
    }

    /// Renders a request into the role-structured messages sent to the model:
    /// the interpolated system template followed by the request's turns.
    pub fn render(&self, request: &PromptRequest) -> Vec<ChatMessage> {
        let system = interpolate(self.template(request.kind), &request.variables);

        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(request.turns.iter().cloned());
        messages
    }
}

/// Single pass over the template: substituted values are never rescanned,
/// so candidate text containing `{...}` cannot pull in another variable.
fn interpolate(template: &str, variables: &[(&'static str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            variables
                .iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (value, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A model call described by template id, named variables and conversation turns.
/// The orchestrator never builds prompt text itself; the store renders it.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub variables: Vec<(&'static str, String)>,
    pub turns: Vec<ChatMessage>,
}

impl PromptRequest {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            variables: Vec::new(),
            turns: Vec::new(),
        }
    }

    pub fn var(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.variables.push((name, value.into()));
        self
    }

    pub fn turn(mut self, message: ChatMessage) -> Self {
        self.turns.push(message);
        self
    }

    pub fn turns(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.turns.extend(messages);
        self
    }
}
