// src/models/answer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::question::Question;
use crate::utils::math::{round_half_up, saturate_i64};

pub const ANONYMOUS_SESSION: &str = "anonymous";
pub const BASE_SCORE: i64 = 10;
pub const SECONDS_PER_BONUS_POINT: i64 = 3;
pub const HISTORY_LENGTH: usize = 10;

/// One evaluated answer, kept in the in-process answer history.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub id: i64,
    pub session_id: String,
    pub question_id: i64,
    /// `None` when the countdown ran out without a selection.
    pub selected_answer: Option<i64>,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub score: i64,
    pub time_remaining: i64,
    pub timestamp: DateTime<Utc>,
}

/// An answer record before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewAnswerRecord {
    pub session_id: String,
    pub question_id: i64,
    pub selected_answer: Option<i64>,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub score: i64,
    pub time_remaining: i64,
    pub timestamp: DateTime<Utc>,
}

impl NewAnswerRecord {
    pub fn with_id(self, id: i64) -> AnswerRecord {
        AnswerRecord {
            id,
            session_id: self.session_id,
            question_id: self.question_id,
            selected_answer: self.selected_answer,
            correct_answer: self.correct_answer,
            is_correct: self.is_correct,
            score: self.score,
            time_remaining: self.time_remaining,
            timestamp: self.timestamp,
        }
    }
}

/// DTO for checking an answer.
///
/// `selectedAnswer` must be present but may be `null` (timeout); the outer
/// `Option` tracks presence, the inner one the selection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub question_id: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub selected_answer: Option<Option<i64>>,
    pub time_remaining: Option<i64>,
    pub session_id: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Result of checking one answer.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub is_correct: bool,
    pub score: i64,
    pub explanation: String,
    pub correct_answer: usize,
    pub selected_answer: Option<i64>,
    pub time_bonus: i64,
    pub question: String,
}

/// Bonus points for answering quickly. Informational for wrong answers.
pub fn time_bonus(time_remaining: i64) -> i64 {
    time_remaining.div_euclid(SECONDS_PER_BONUS_POINT)
}

/// Correct answers earn the base score plus the time bonus, never less than the base.
pub fn answer_score(is_correct: bool, time_remaining: i64) -> i64 {
    if is_correct {
        BASE_SCORE.max(BASE_SCORE + time_bonus(time_remaining))
    } else {
        0
    }
}

/// Checks `selected` against the question's answer key.
pub fn evaluate(question: &Question, selected: Option<i64>, time_remaining: i64) -> EvaluateResponse {
    let is_correct = selected
        .and_then(|s| usize::try_from(s).ok())
        .is_some_and(|s| s == question.correct);

    EvaluateResponse {
        is_correct,
        score: answer_score(is_correct, time_remaining),
        explanation: question.explanation.clone(),
        correct_answer: question.correct,
        selected_answer: selected,
        time_bonus: time_bonus(time_remaining),
        question: question.question.clone(),
    }
}

/// Query parameters for answer statistics.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AnswerStatsParams {
    pub session_id: Option<String>,
}

/// Aggregates over the answer history.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStatistics {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    pub accuracy: i64,
    pub total_score: i64,
    pub average_score: i64,
    pub average_time_used: i64,
    pub history: Vec<AnswerRecord>,
}

impl AnswerStatistics {
    /// `time_limit` is the countdown each question starts from; time used is
    /// `time_limit - time_remaining`.
    pub fn from_records(records: Vec<AnswerRecord>, time_limit: i64) -> Self {
        let total = records.len();
        let correct = records.iter().filter(|r| r.is_correct).count();
        // Client-reported times are unbounded, so sums are taken in i128.
        let total_score: i128 = records.iter().map(|r| i128::from(r.score)).sum();
        let time_used: i128 = records
            .iter()
            .map(|r| i128::from(time_limit) - i128::from(r.time_remaining))
            .sum();

        let (accuracy, average_score, average_time_used) = if total == 0 {
            (0, 0, 0)
        } else {
            let n = total as f64;
            (
                round_half_up(correct as f64 / n * 100.0),
                round_half_up(total_score as f64 / n),
                round_half_up(time_used as f64 / n),
            )
        };

        let history = records[total.saturating_sub(HISTORY_LENGTH)..].to_vec();

        Self {
            total_questions: total,
            correct_answers: correct,
            wrong_answers: total - correct,
            accuracy,
            total_score: saturate_i64(total_score),
            average_score,
            average_time_used,
            history,
        }
    }
}
