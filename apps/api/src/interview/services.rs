use std::sync::Arc;

use tracing::{debug, warn};

use crate::interview::error::{GenerationError, Stage};
use crate::llm_client::{LanguageModel, LlmError};
use crate::prompts::{PromptRequest, PromptStore};

/// Everything an interview needs from outside: the model and the prompt store.
/// Cheap to clone; shared by every session.
#[derive(Clone)]
pub struct InterviewServices {
    pub model: Arc<dyn LanguageModel>,
    pub prompts: Arc<PromptStore>,
}

impl InterviewServices {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptStore>) -> Self {
        Self { model, prompts }
    }

    /// Renders the request through the prompt store and returns the model's text.
    /// Empty output is an error for every stage.
    pub async fn generate(
        &self,
        stage: Stage,
        request: PromptRequest,
    ) -> Result<String, GenerationError> {
        let messages = self.prompts.render(&request);
        debug!("Calling model for {} with {} messages", stage, messages.len());

        match self.model.complete(&messages).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Model returned empty output for {}", stage);
                Err(GenerationError::Empty { stage })
            }
            Ok(text) => Ok(text.trim().to_string()),
            Err(LlmError::EmptyContent) => {
                warn!("Model returned empty output for {}", stage);
                Err(GenerationError::Empty { stage })
            }
            Err(source) => {
                warn!("Model call for {} failed: {}", stage, source);
                Err(GenerationError::Model { stage, source })
            }
        }
    }
}
