use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::interview::profile::ValidationError;
use crate::llm_client::LlmError;

/// Which collaborator a model call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Question,
    ReferenceAnswer,
    Analysis,
    Scoring,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Question => "question generation",
            Stage::ReferenceAnswer => "reference answer generation",
            Stage::Analysis => "response analysis",
            Stage::Scoring => "scoring",
        })
    }
}

/// A model call failed or produced nothing usable.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{stage} failed: {source}")]
    Model {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("{stage} returned an empty response")]
    Empty { stage: Stage },
}

impl GenerationError {
    #[cfg(test)]
    pub fn stage(&self) -> Stage {
        match self {
            GenerationError::Model { stage, .. } | GenerationError::Empty { stage } => *stage,
        }
    }
}

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: &'static str },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
