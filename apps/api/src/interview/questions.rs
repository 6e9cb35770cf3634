//! Question Generator: asks the model for the next interview question,
//! pitched by the candidate profile and aware of every earlier round.

use tracing::info;

use crate::interview::error::{GenerationError, Stage};
use crate::interview::profile::CandidateProfile;
use crate::interview::services::InterviewServices;
use crate::interview::transcript::Transcript;
use crate::llm_client::ChatMessage;
use crate::prompts::{instructions, PromptKind, PromptRequest};

/// Generates question `question_number` (1-based) of `max_questions`.
pub async fn generate_question(
    services: &InterviewServices,
    profile: &CandidateProfile,
    transcript: &Transcript,
    question_number: usize,
    max_questions: usize,
) -> Result<String, GenerationError> {
    let instruction = if question_number <= 1 {
        instructions::first_question(max_questions)
    } else {
        instructions::next_question(question_number, max_questions)
    };

    let request = profile_request(profile)
        .turns(conversation(transcript))
        .turn(ChatMessage::user(instructions::question_turn(&instruction)));

    let question = services.generate(Stage::Question, request).await?;
    info!(
        "Generated question {}/{}: {}",
        question_number,
        max_questions,
        question.chars().take(60).collect::<String>()
    );
    Ok(question)
}

/// The question template with the profile interpolated into it.
fn profile_request(profile: &CandidateProfile) -> PromptRequest {
    PromptRequest::new(PromptKind::QuestionGeneration)
        .var("experience_level", profile.experience_level().as_str())
        .var("experience_years", profile.experience_years.as_str())
        .var("desired_positions", profile.desired_positions.join(", "))
        .var("tech_stack", profile.tech_stack.join(", "))
        .var("key_technologies", profile.key_technologies.join(", "))
}

/// Replays earlier rounds so the model can build on them and avoid repeats.
fn conversation(transcript: &Transcript) -> Vec<ChatMessage> {
    transcript
        .rounds()
        .into_iter()
        .flat_map(|(question, answer)| {
            std::iter::once(ChatMessage::assistant(question)).chain(
                answer.map(|a| ChatMessage::user(instructions::analysis_turn(a))),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::profile::sample_form;
    use crate::interview::testing::{services, ScriptedModel};
    use crate::interview::transcript::TranscriptEntry;
    use crate::llm_client::Role;

    #[tokio::test]
    async fn test_first_question_prompt_carries_profile() {
        let model = ScriptedModel::new();
        model.reply(Stage::Question, "  Explain overfitting.  ");
        let svc = services(model.clone());
        let profile = sample_form().validate().unwrap();

        let question = generate_question(&svc, &profile, &Transcript::new(), 1, 3)
            .await
            .unwrap();
        assert_eq!(question, "Explain overfitting.");

        let calls = model.calls(Stage::Question);
        let messages = &calls[0];
        assert_eq!(
            messages[0].content,
            "QUESTION level=Mid years=3-5 years positions=Software Engineer stack=Python key=Machine Learning"
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[1].content,
            "Answer: Generate question 1 of 3 technical interview questions."
        );
    }

    #[tokio::test]
    async fn test_later_question_replays_history() {
        let model = ScriptedModel::new();
        let svc = services(model.clone());
        let profile = sample_form().validate().unwrap();

        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::InterviewQuestion {
            question_number: 1,
            question: "Explain overfitting.".to_string(),
            analysis: None,
        });
        transcript.push(TranscriptEntry::CandidateAnswer {
            question_number: 1,
            answer: "Memorizing the training set.".to_string(),
        });

        generate_question(&svc, &profile, &transcript, 2, 3)
            .await
            .unwrap();

        let messages = &model.calls(Stage::Question)[0];
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::Assistant, Role::User, Role::User]
        );
        assert_eq!(messages[1].content, "Explain overfitting.");
        assert_eq!(messages[2].content, "Answer: Memorizing the training set.");
        assert!(messages[3].content.contains("Generate question 2 of 3"));
        assert!(messages[3].content.contains("different from previous questions"));
    }

    #[tokio::test]
    async fn test_empty_question_is_generation_error() {
        let model = ScriptedModel::new();
        model.reply(Stage::Question, "   ");
        let svc = services(model);
        let profile = sample_form().validate().unwrap();

        let err = generate_question(&svc, &profile, &Transcript::new(), 1, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Empty { stage: Stage::Question }));
    }

    #[tokio::test]
    async fn test_model_failure_carries_cause() {
        let model = ScriptedModel::new();
        model.fail(Stage::Question);
        let svc = services(model);
        let profile = sample_form().validate().unwrap();

        let err = generate_question(&svc, &profile, &Transcript::new(), 1, 3)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Question);
        assert!(err.to_string().contains("scripted failure"));
    }
}
