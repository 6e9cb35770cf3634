//! Response Analyzer: a short qualitative read of how the candidate came across.

use tracing::info;

use crate::interview::error::{GenerationError, Stage};
use crate::interview::services::InterviewServices;
use crate::llm_client::ChatMessage;
use crate::prompts::{instructions, PromptKind, PromptRequest};

pub async fn analyze_response(
    services: &InterviewServices,
    question: &str,
    answer: &str,
) -> Result<String, GenerationError> {
    let request = PromptRequest::new(PromptKind::ResponseAnalysis)
        .turn(ChatMessage::assistant(question))
        .turn(ChatMessage::user(instructions::analysis_turn(answer)));

    let analysis = services.generate(Stage::Analysis, request).await?;
    info!(
        "Response analyzed: {}",
        analysis.chars().take(60).collect::<String>()
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::testing::{services, ScriptedModel};
    use crate::llm_client::Role;

    #[tokio::test]
    async fn test_analysis_sees_question_then_answer() {
        let model = ScriptedModel::new();
        model.reply(Stage::Analysis, "Confident and on topic.");
        let svc = services(model.clone());

        let analysis = analyze_response(&svc, "What is a race?", "Two writers, no lock.")
            .await
            .unwrap();
        assert_eq!(analysis, "Confident and on topic.");

        let messages = &model.calls(Stage::Analysis)[0];
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "What is a race?");
        assert_eq!(messages[2], ChatMessage::user("Answer: Two writers, no lock."));
    }

    #[tokio::test]
    async fn test_empty_analysis_is_generation_error() {
        let model = ScriptedModel::new();
        model.reply(Stage::Analysis, "");
        let svc = services(model);

        let err = analyze_response(&svc, "Q", "A").await.unwrap_err();
        assert!(matches!(err, GenerationError::Empty { stage: Stage::Analysis }));
    }
}
