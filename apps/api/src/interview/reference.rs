//! Reference Answer Generator: a model-written answer kept for scoring only.

use tracing::info;

use crate::interview::error::{GenerationError, Stage};
use crate::interview::services::InterviewServices;
use crate::llm_client::ChatMessage;
use crate::prompts::{instructions, PromptKind, PromptRequest};

pub async fn generate_reference_answer(
    services: &InterviewServices,
    question: &str,
) -> Result<String, GenerationError> {
    let request = PromptRequest::new(PromptKind::ReferenceAnswer)
        .turn(ChatMessage::user(instructions::reference_turn(question)));

    let answer = services.generate(Stage::ReferenceAnswer, request).await?;
    info!(
        "Reference answer generated: {}",
        answer.chars().take(60).collect::<String>()
    );
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::testing::{services, ScriptedModel};

    #[tokio::test]
    async fn test_reference_prompt_wraps_question() {
        let model = ScriptedModel::new();
        model.reply(Stage::ReferenceAnswer, "Overfitting is fitting noise.");
        let svc = services(model.clone());

        let answer = generate_reference_answer(&svc, "Explain overfitting.")
            .await
            .unwrap();
        assert_eq!(answer, "Overfitting is fitting noise.");

        let messages = &model.calls(Stage::ReferenceAnswer)[0];
        assert_eq!(messages[0].content, "REFERENCE");
        assert_eq!(messages[1], ChatMessage::user("Question: Explain overfitting."));
    }

    #[tokio::test]
    async fn test_reference_failure_is_generation_error() {
        let model = ScriptedModel::new();
        model.fail(Stage::ReferenceAnswer);
        let svc = services(model);

        let err = generate_reference_answer(&svc, "Q").await.unwrap_err();
        assert_eq!(err.stage(), Stage::ReferenceAnswer);
    }
}
