//! Scripted in-memory model for tests. Replies are queued per stage;
//! an empty queue falls back to a canned reply.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::interview::error::Stage;
use crate::interview::services::InterviewServices;
use crate::llm_client::{ChatMessage, LanguageModel, LlmError};
use crate::prompts::PromptStore;

pub const TEST_PROMPTS: &str = r#"
prompt_bot: "QUESTION level={experience_level} years={experience_years} positions={desired_positions} stack={tech_stack} key={key_technologies}"
answer_bot: "REFERENCE"
prompt_analysis: "ANALYSIS"
prompt_score: "SCORE q={question} ref={correct_answer}"
"#;

pub const DEFAULT_SCORE: &str = r#"{"relevance_score": 8, "accuracy_score": 7, "completeness_score": 6, "clarity_score": 8, "depth_score": 6, "overall_score": 7.0}"#;

enum Reply {
    Text(String),
    Fail(u16),
    Stall,
}

#[derive(Default)]
pub struct ScriptedModel {
    queued: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
    calls: Mutex<Vec<(Stage, Vec<ChatMessage>)>>,
}

fn key(stage: Stage) -> &'static str {
    match stage {
        Stage::Question => "QUESTION",
        Stage::ReferenceAnswer => "REFERENCE",
        Stage::Analysis => "ANALYSIS",
        Stage::Scoring => "SCORE",
    }
}

fn stage_of(system: &str) -> Stage {
    [
        Stage::Question,
        Stage::ReferenceAnswer,
        Stage::Analysis,
        Stage::Scoring,
    ]
    .into_iter()
    .find(|s| system.starts_with(key(*s)))
    .unwrap_or_else(|| panic!("unrecognised system prompt: {system}"))
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, stage: Stage, text: &str) -> &Self {
        self.push(stage, Reply::Text(text.to_string()))
    }

    /// Queues a provider error (HTTP 500) for the next call of `stage`.
    pub fn fail(&self, stage: Stage) -> &Self {
        self.push(stage, Reply::Fail(500))
    }

    /// The next call of `stage` never returns.
    pub fn stall(&self, stage: Stage) -> &Self {
        self.push(stage, Reply::Stall)
    }

    fn push(&self, stage: Stage, reply: Reply) -> &Self {
        self.queued
            .lock()
            .unwrap()
            .entry(key(stage))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self, stage: Stage) -> Vec<Vec<ChatMessage>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn call_count(&self, stage: Stage) -> usize {
        self.calls(stage).len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let stage = stage_of(&messages[0].content);
        let prior = self.call_count(stage);
        self.calls.lock().unwrap().push((stage, messages.to_vec()));

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(key(stage))
            .and_then(VecDeque::pop_front);

        match queued {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(status)) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            Some(Reply::Stall) => std::future::pending().await,
            None => Ok(match stage {
                Stage::Question => format!("Generated question {}", prior + 1),
                Stage::ReferenceAnswer => format!("Reference answer {}", prior + 1),
                Stage::Analysis => "The candidate sounded confident.".to_string(),
                Stage::Scoring => DEFAULT_SCORE.to_string(),
            }),
        }
    }
}

pub fn services(model: Arc<ScriptedModel>) -> InterviewServices {
    let prompts = PromptStore::from_yaml_str(TEST_PROMPTS).unwrap();
    InterviewServices::new(model, Arc::new(prompts))
}
