//! Score Aggregator: one rubric score per answered question, averaged into
//! a session-level result with a qualitative tier.
//!
//! The model replies in free text that should contain a JSON object. The first
//! balanced `{...}` block is parsed by key; anything that does not parse is
//! kept verbatim as `ScoreOutcome::Unparsed` and left out of the average.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::interview::error::{GenerationError, Stage};
use crate::interview::services::InterviewServices;
use crate::interview::transcript::{ScoringTriple, Transcript};
use crate::llm_client::ChatMessage;
use crate::prompts::{instructions, PromptKind, PromptRequest};

pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub relevance: f64,
    pub accuracy: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub depth: f64,
    /// Taken from the model as reported, not recomputed from the five dimensions.
    pub overall: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(ScoreRecord),
    Unparsed { raw: String },
}

impl ScoreOutcome {
    pub fn record(&self) -> Option<&ScoreRecord> {
        match self {
            ScoreOutcome::Scored(record) => Some(record),
            ScoreOutcome::Unparsed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl Tier {
    pub fn for_score(score: f64) -> Self {
        if score >= 8.0 {
            Tier::Excellent
        } else if score >= 6.0 {
            Tier::Good
        } else if score >= 4.0 {
            Tier::Fair
        } else {
            Tier::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionScore {
    pub question_number: usize,
    pub question: String,
    pub outcome: ScoreOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub questions: Vec<QuestionScore>,
    pub skipped: Vec<usize>,
    pub average_overall: Option<f64>,
    pub tier: Option<Tier>,
}

impl ScoreReport {
    /// Averages `overall` over the parsed records only.
    pub fn new(questions: Vec<QuestionScore>, skipped: Vec<usize>) -> Self {
        let overalls: Vec<f64> = questions
            .iter()
            .filter_map(|q| q.outcome.record())
            .map(|r| r.overall)
            .collect();

        let average_overall = if overalls.is_empty() {
            None
        } else {
            Some(overalls.iter().sum::<f64>() / overalls.len() as f64)
        };

        Self {
            questions,
            skipped,
            average_overall,
            tier: average_overall.map(Tier::for_score),
        }
    }
}

/// Scores every complete question/reference/answer triple in the transcript.
/// A failed model call aborts the whole request; unparseable replies do not.
pub async fn score_transcript(
    services: &InterviewServices,
    transcript: &Transcript,
) -> Result<ScoreReport, GenerationError> {
    let plan = transcript.scoring_plan();
    info!(
        "Scoring {} answers ({} positions skipped)",
        plan.triples.len(),
        plan.skipped.len()
    );

    let mut questions = Vec::with_capacity(plan.triples.len());
    for triple in plan.triples {
        let outcome = score_answer(services, &triple).await?;
        questions.push(QuestionScore {
            question_number: triple.question_number,
            question: triple.question,
            outcome,
        });
    }

    let report = ScoreReport::new(questions, plan.skipped);
    match report.average_overall {
        Some(avg) => info!("Interview average {:.1}/10 ({:?})", avg, report.tier),
        None => warn!("No score response could be parsed"),
    }
    Ok(report)
}

pub async fn score_answer(
    services: &InterviewServices,
    triple: &ScoringTriple,
) -> Result<ScoreOutcome, GenerationError> {
    let request = PromptRequest::new(PromptKind::Scoring)
        .var("question", triple.question.as_str())
        .var("correct_answer", triple.reference_answer.as_str())
        .turn(ChatMessage::user(instructions::scoring_turn(
            &triple.candidate_answer,
        )));

    let raw = services.generate(Stage::Scoring, request).await?;
    let outcome = parse_score_response(&raw);
    if outcome.record().is_none() {
        warn!(
            "Score for question {} is not structured; keeping raw text",
            triple.question_number
        );
    }
    Ok(outcome)
}

pub fn parse_score_response(raw: &str) -> ScoreOutcome {
    let parsed = first_object_block(raw)
        .and_then(|block| serde_json::from_str::<Value>(block).ok())
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        });

    match parsed {
        Some(map) => ScoreOutcome::Scored(ScoreRecord {
            relevance: score_field(&map, "relevance_score"),
            accuracy: score_field(&map, "accuracy_score"),
            completeness: score_field(&map, "completeness_score"),
            clarity: score_field(&map, "clarity_score"),
            depth: score_field(&map, "depth_score"),
            overall: score_field(&map, "overall_score"),
            feedback: map
                .get("feedback")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }),
        None => ScoreOutcome::Unparsed {
            raw: raw.to_string(),
        },
    }
}

/// Numbers or numeric strings, clamped to 0–10. Absent or malformed values are 0.
fn score_field(map: &Map<String, Value>, key: &str) -> f64 {
    let value = match map.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches("/10").trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, MAX_SCORE))
        .unwrap_or(0.0)
}

/// The first balanced top-level `{...}` block, skipping braces inside JSON strings.
fn first_object_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
