//! Interview transcript: an append-only, ordered record of one interview run.
//! Entry order defines round boundaries.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// A question put to the candidate. From round 2 on it carries the analysis
    /// of the previous answer, shown together with the question.
    InterviewQuestion {
        question_number: usize,
        question: String,
        analysis: Option<String>,
    },
    CandidateAnswer {
        question_number: usize,
        answer: String,
    },
    /// `fallback` marks the placeholder written when generation failed.
    ReferenceAnswer {
        question_number: usize,
        answer: String,
        fallback: bool,
    },
    CompletionNotice {
        analysis: String,
        message: String,
    },
}

impl TranscriptEntry {
    pub fn is_reference(&self) -> bool {
        matches!(self, TranscriptEntry::ReferenceAnswer { .. })
    }
}

/// One question with the reference answer and candidate answer at the same position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringTriple {
    pub question_number: usize,
    pub question: String,
    pub reference_answer: String,
    pub candidate_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringPlan {
    pub triples: Vec<ScoringTriple>,
    /// Positions that lacked a part or only had a placeholder reference.
    pub skipped: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently posed question.
    pub fn last_question(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match e {
            TranscriptEntry::InterviewQuestion { question, .. } => Some(question.as_str()),
            _ => None,
        })
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::InterviewQuestion { question, .. } => Some(question.as_str()),
            _ => None,
        })
    }

    pub fn candidate_answers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::CandidateAnswer { answer, .. } => Some(answer.as_str()),
            _ => None,
        })
    }

    /// `(answer, is_placeholder)` for every reference answer, in order.
    pub fn reference_answers(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::ReferenceAnswer {
                answer, fallback, ..
            } => Some((answer.as_str(), *fallback)),
            _ => None,
        })
    }

    /// Questions paired positionally with the answers given so far.
    /// A question still awaiting its answer pairs with `None`.
    pub fn rounds(&self) -> Vec<(&str, Option<&str>)> {
        let mut answers = self.candidate_answers();
        self.questions().map(|q| (q, answers.next())).collect()
    }

    /// Groups the i-th question, reference answer and candidate answer.
    /// Counts may differ; any position missing a part is skipped, not an error.
    pub fn scoring_plan(&self) -> ScoringPlan {
        let questions: Vec<&str> = self.questions().collect();
        let references: Vec<(&str, bool)> = self.reference_answers().collect();
        let answers: Vec<&str> = self.candidate_answers().collect();

        let positions = questions.len().max(references.len()).max(answers.len());
        let mut plan = ScoringPlan::default();

        for i in 0..positions {
            match (questions.get(i), references.get(i), answers.get(i)) {
                (Some(question), Some((reference, false)), Some(answer)) => {
                    plan.triples.push(ScoringTriple {
                        question_number: i + 1,
                        question: question.to_string(),
                        reference_answer: reference.to_string(),
                        candidate_answer: answer.to_string(),
                    });
                }
                _ => plan.skipped.push(i + 1),
            }
        }

        plan
    }
}
