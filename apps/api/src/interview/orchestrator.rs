//! Interview Orchestrator, the state machine that sequences one interview:
//! profile → question → answer → analysis → next question or completion → scores.
//!
//! The phase is a single enum so contradictory states (completed while still
//! awaiting an answer, an error with no message) cannot be represented.
//! Every transition is published on a watch channel; readers only ever see
//! snapshots, and commands go through `&mut Interview`.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::interview::analysis::analyze_response;
use crate::interview::error::{GenerationError, InterviewError};
use crate::interview::profile::{
    CandidateProfile, ExperienceLevel, ProfileForm, ValidationError,
};
use crate::interview::questions::generate_question;
use crate::interview::reference::generate_reference_answer;
use crate::interview::scoring::{score_transcript, ScoreReport};
use crate::interview::services::InterviewServices;
use crate::interview::transcript::{Transcript, TranscriptEntry};
use crate::prompts::instructions;

/// Questions per interview.
pub const MAX_QUESTIONS: usize = 3;

/// Stored in place of a reference answer the model failed to produce.
pub const REFERENCE_PLACEHOLDER: &str = "Could not generate correct answer";

/// Where a dismissed error returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    QuestionPending,
    Completed,
    ScoresShown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    NotStarted,
    /// Running, but the question for the current index has not been generated.
    QuestionPending,
    AwaitingAnswer,
    ProcessingAnswer,
    Completed,
    ScoresShown,
    Error {
        message: String,
        resume_to: Checkpoint,
    },
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::QuestionPending => "waiting for a question",
            Phase::AwaitingAnswer => "awaiting an answer",
            Phase::ProcessingAnswer => "processing an answer",
            Phase::Completed => "completed",
            Phase::ScoresShown => "showing scores",
            Phase::Error { .. } => "in error",
        }
    }
}

impl From<Checkpoint> for Phase {
    fn from(checkpoint: Checkpoint) -> Self {
        match checkpoint {
            Checkpoint::QuestionPending => Phase::QuestionPending,
            Checkpoint::Completed => Phase::Completed,
            Checkpoint::ScoresShown => Phase::ScoresShown,
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterviewSnapshot {
    pub phase: Phase,
    pub last_error: Option<String>,
    pub profile: Option<CandidateProfile>,
    pub experience_level: Option<ExperienceLevel>,
    pub current_question: usize,
    pub max_questions: usize,
    pub progress: f64,
    pub waiting_for_answer: bool,
    pub processing_answer: bool,
    pub transcript: Vec<TranscriptEntry>,
    pub scores: Option<ScoreReport>,
}

pub struct Interview {
    profile: Option<CandidateProfile>,
    transcript: Transcript,
    current_question: usize,
    phase: Phase,
    scores: Option<ScoreReport>,
    /// Analysis of the last answer, held while its follow-up question is retried.
    pending_analysis: Option<String>,
    updates: watch::Sender<InterviewSnapshot>,
}

impl Default for Interview {
    fn default() -> Self {
        Self::new()
    }
}

impl Interview {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(InterviewSnapshot::default());
        let interview = Self {
            profile: None,
            transcript: Transcript::new(),
            current_question: 0,
            phase: Phase::NotStarted,
            scores: None,
            pending_analysis: None,
            updates,
        };
        interview.publish();
        interview
    }

    pub fn subscribe(&self) -> watch::Receiver<InterviewSnapshot> {
        self.updates.subscribe()
    }

    #[cfg(test)]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[cfg(test)]
    pub fn profile(&self) -> Option<&CandidateProfile> {
        self.profile.as_ref()
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[cfg(test)]
    pub fn current_question(&self) -> usize {
        self.current_question
    }

    #[cfg(test)]
    pub fn scores(&self) -> Option<&ScoreReport> {
        self.scores.as_ref()
    }

    pub fn snapshot(&self) -> InterviewSnapshot {
        // Reference answers stay hidden until the score screen.
        let reveal_references = matches!(
            self.phase,
            Phase::ScoresShown
                | Phase::Error {
                    resume_to: Checkpoint::ScoresShown,
                    ..
                }
        );

        InterviewSnapshot {
            phase: self.phase.clone(),
            last_error: match &self.phase {
                Phase::Error { message, .. } => Some(message.clone()),
                _ => None,
            },
            profile: self.profile.clone(),
            experience_level: self.profile.as_ref().map(CandidateProfile::experience_level),
            current_question: self.current_question,
            max_questions: MAX_QUESTIONS,
            progress: self.current_question as f64 / MAX_QUESTIONS as f64,
            waiting_for_answer: self.phase == Phase::AwaitingAnswer,
            processing_answer: self.phase == Phase::ProcessingAnswer,
            transcript: self
                .transcript
                .entries()
                .iter()
                .filter(|e| reveal_references || !e.is_reference())
                .cloned()
                .collect(),
            scores: self.scores.clone(),
        }
    }

    /// Validates and stores a new profile. Always discards any interview in progress,
    /// including a round that was abandoned mid-processing; a rejected form leaves
    /// everything untouched.
    pub fn submit_profile(&mut self, form: ProfileForm) -> Result<(), InterviewError> {
        let profile = form.validate()?;
        info!(
            "Profile accepted: level={}, positions={}",
            profile.experience_level().as_str(),
            profile.desired_positions.join(", ")
        );
        self.profile = Some(profile);
        self.clear_run();
        self.transition(Phase::NotStarted);
        Ok(())
    }

    /// Starts a fresh run (or restarts a finished one) and asks question 1.
    pub async fn start(&mut self, services: &InterviewServices) -> Result<(), InterviewError> {
        let allowed = match self.phase {
            Phase::NotStarted => self.profile.is_some(),
            Phase::Completed | Phase::ScoresShown => true,
            _ => false,
        };
        if !allowed {
            return Err(self.invalid("start the interview"));
        }

        self.clear_run();
        self.transition(Phase::QuestionPending);
        self.ask_question(services, None).await
    }

    /// Retries question generation after a dismissed error.
    pub async fn resume(&mut self, services: &InterviewServices) -> Result<(), InterviewError> {
        if self.phase != Phase::QuestionPending {
            return Err(self.invalid("resume the interview"));
        }
        let analysis = self.pending_analysis.take();
        self.ask_question(services, analysis).await
    }

    /// Runs one round: record the answer, fetch reference answer and analysis,
    /// then either ask the next question or finish.
    ///
    /// Reference and analysis failures degrade to placeholder text. A failure
    /// generating the next question moves to `Error`; whatever was appended
    /// before it stays in the transcript.
    pub async fn submit_answer(
        &mut self,
        services: &InterviewServices,
        answer: &str,
    ) -> Result<(), InterviewError> {
        if self.phase != Phase::AwaitingAnswer {
            return Err(self.invalid("submit an answer"));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ValidationError::single("answer", "Answer cannot be empty").into());
        }
        let question = match self.transcript.last_question() {
            Some(q) => q.to_string(),
            None => return Err(self.invalid("submit an answer")),
        };

        let question_number = self.current_question + 1;
        info!("Processing answer for question {}/{}", question_number, MAX_QUESTIONS);

        self.transcript.push(TranscriptEntry::CandidateAnswer {
            question_number,
            answer: answer.to_string(),
        });
        self.transition(Phase::ProcessingAnswer);

        // Neither call depends on the other.
        let (reference, analysis) = tokio::join!(
            generate_reference_answer(services, &question),
            analyze_response(services, &question, answer),
        );

        let (reference, fallback) = match reference {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("Using placeholder reference answer: {}", e);
                (REFERENCE_PLACEHOLDER.to_string(), true)
            }
        };
        self.transcript.push(TranscriptEntry::ReferenceAnswer {
            question_number,
            answer: reference,
            fallback,
        });

        let analysis = analysis.unwrap_or_else(|e| {
            warn!("Analysis unavailable: {}", e);
            format!("Analysis error: {e}")
        });

        self.current_question += 1;

        if self.current_question < MAX_QUESTIONS {
            self.ask_question(services, Some(analysis)).await
        } else {
            info!("Interview completed: all {} questions answered", MAX_QUESTIONS);
            self.transcript.push(TranscriptEntry::CompletionNotice {
                analysis,
                message: instructions::completion_notice(MAX_QUESTIONS),
            });
            self.transition(Phase::Completed);
            Ok(())
        }
    }

    /// Scores every answered question. Re-requesting from the score screen recomputes.
    pub async fn request_scores(
        &mut self,
        services: &InterviewServices,
    ) -> Result<(), InterviewError> {
        let checkpoint = match self.phase {
            Phase::Completed => Checkpoint::Completed,
            Phase::ScoresShown => Checkpoint::ScoresShown,
            _ => return Err(self.invalid("request scores")),
        };

        let result = score_transcript(services, &self.transcript).await;
        match result {
            Ok(report) => {
                self.scores = Some(report);
                self.transition(Phase::ScoresShown);
                Ok(())
            }
            Err(e) => Err(self.fail(e, checkpoint)),
        }
    }

    /// Back to `NotStarted` from any phase, keeping the profile. Calling it
    /// repeatedly is harmless. This is also the way out of a round whose future
    /// was dropped while `ProcessingAnswer`.
    pub fn reset(&mut self) {
        info!("Resetting interview state");
        self.clear_run();
        self.transition(Phase::NotStarted);
    }

    /// Clears the error and returns to where it was raised. Nothing is re-run.
    pub fn dismiss_error(&mut self) -> Result<(), InterviewError> {
        match self.phase {
            Phase::Error { resume_to, .. } => {
                self.transition(resume_to.into());
                Ok(())
            }
            _ => Err(self.invalid("dismiss an error")),
        }
    }

    async fn ask_question(
        &mut self,
        services: &InterviewServices,
        analysis: Option<String>,
    ) -> Result<(), InterviewError> {
        let Some(profile) = self.profile.as_ref() else {
            return Err(self.invalid("generate a question"));
        };
        let question_number = self.current_question + 1;

        let result = generate_question(
            services,
            profile,
            &self.transcript,
            question_number,
            MAX_QUESTIONS,
        )
        .await;

        match result {
            Ok(question) => {
                self.transcript.push(TranscriptEntry::InterviewQuestion {
                    question_number,
                    question,
                    analysis,
                });
                self.transition(Phase::AwaitingAnswer);
                Ok(())
            }
            Err(e) => {
                self.pending_analysis = analysis;
                Err(self.fail(e, Checkpoint::QuestionPending))
            }
        }
    }

    fn fail(&mut self, err: GenerationError, resume_to: Checkpoint) -> InterviewError {
        error!("Interview error ({}): {}", self.phase.label(), err);
        self.transition(Phase::Error {
            message: err.to_string(),
            resume_to,
        });
        InterviewError::Generation(err)
    }

    fn invalid(&self, action: &'static str) -> InterviewError {
        InterviewError::InvalidTransition {
            action,
            phase: self.phase.label(),
        }
    }

    fn clear_run(&mut self) {
        self.transcript.clear();
        self.current_question = 0;
        self.scores = None;
        self.pending_analysis = None;
    }

    fn transition(&mut self, phase: Phase) {
        if self.phase != phase {
            info!("Interview phase: {} -> {}", self.phase.label(), phase.label());
        }
        self.phase = phase;
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}
