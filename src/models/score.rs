// src/models/score.rs

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;
use crate::utils::math::{percent, round_half_up};

pub const ANONYMOUS_PLAYER: &str = "Anonymous";
pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const PERFECT_SCORE: f64 = 100.0;

/// Letter grade derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn for_score(total_score: f64) -> Self {
        if total_score >= 90.0 {
            Grade::A
        } else if total_score >= 80.0 {
            Grade::B
        } else if total_score >= 70.0 {
            Grade::C
        } else {
            Grade::D
        }
    }
}

/// A completed quiz in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: i64,
    pub session_id: String,
    pub player_name: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_score: f64,
    /// Percentage of correct answers.
    pub accuracy: i64,
    pub grade: Grade,
    /// Seconds the quiz took.
    pub duration: i64,
    pub difficulty: String,
    pub completed_at: DateTime<Utc>,
    /// Per-question details as sent by the client.
    #[schema(value_type = Vec<Object>)]
    pub answers: Vec<serde_json::Value>,
}

/// A validated submission waiting for the store to assign its id.
#[derive(Debug, Clone)]
pub struct NewScore {
    pub session_id: String,
    pub player_name: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_score: f64,
    pub duration: i64,
    pub difficulty: String,
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<serde_json::Value>,
}

impl NewScore {
    pub fn with_id(self, id: i64) -> ScoreRecord {
        ScoreRecord {
            id,
            accuracy: percent(self.correct_answers, self.total_questions),
            grade: Grade::for_score(self.total_score),
            session_id: self.session_id,
            player_name: self.player_name,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            total_score: self.total_score,
            duration: self.duration,
            difficulty: self.difficulty,
            completed_at: self.completed_at,
            answers: self.answers,
        }
    }
}

/// DTO for submitting a finished quiz.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    #[validate(
        required(message = "sessionId is required"),
        length(min = 1, max = 100, message = "sessionId must be 1-100 characters")
    )]
    pub session_id: Option<String>,

    #[validate(length(max = 50))]
    pub player_name: Option<String>,

    #[validate(
        required(message = "totalQuestions is required"),
        range(min = 1, message = "totalQuestions must be at least 1")
    )]
    pub total_questions: Option<u32>,

    #[validate(required(message = "correctAnswers is required"))]
    pub correct_answers: Option<u32>,

    #[validate(
        required(message = "totalScore is required"),
        range(min = 0.0, message = "totalScore cannot be negative")
    )]
    pub total_score: Option<f64>,

    #[validate(range(min = 0, message = "duration cannot be negative"))]
    pub duration: Option<i64>,

    #[validate(length(max = 20))]
    pub difficulty: Option<String>,

    #[schema(value_type = Option<Vec<Object>>)]
    pub answers: Option<Vec<serde_json::Value>>,
}

impl SubmitScoreRequest {
    /// Validates the submission and fills in defaults.
    pub fn into_new_score(self, completed_at: DateTime<Utc>) -> Result<NewScore, AppError> {
        self.validate()?;

        let (Some(session_id), Some(total_questions), Some(correct_answers), Some(total_score)) = (
            self.session_id,
            self.total_questions,
            self.correct_answers,
            self.total_score,
        ) else {
            return Err(AppError::BadRequest(
                "Missing required fields: sessionId, totalQuestions, correctAnswers, totalScore"
                    .to_string(),
            ));
        };

        if correct_answers > total_questions {
            return Err(AppError::BadRequest(
                "Correct answers cannot exceed total questions".to_string(),
            ));
        }

        Ok(NewScore {
            session_id,
            player_name: self
                .player_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_PLAYER.to_string()),
            total_questions,
            correct_answers,
            total_score,
            duration: self.duration.unwrap_or(0),
            difficulty: self
                .difficulty
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| crate::models::question::DEFAULT_DIFFICULTY.to_string()),
            completed_at,
            answers: self.answers.unwrap_or_default(),
        })
    }
}

/// Stored record plus facts computed at submission time.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    #[serde(flatten)]
    pub record: ScoreRecord,
    pub is_personal_best: bool,
    pub global_rank: usize,
    pub total_players: usize,
}

/// True for a session's first submission, or when `record` beats every earlier one.
/// `ledger` is in insertion order and contains `record`.
pub fn is_personal_best(ledger: &[ScoreRecord], record: &ScoreRecord) -> bool {
    ledger
        .iter()
        .take_while(|r| r.id != record.id)
        .filter(|r| r.session_id == record.session_id)
        .map(|r| r.total_score)
        .max_by(f64::total_cmp)
        .is_none_or(|best| record.total_score > best)
}

/// 1-based position of `id` when the ledger is ordered by score, highest first.
/// Equal scores keep insertion order.
pub fn global_rank(ledger: &[ScoreRecord], id: i64) -> Option<usize> {
    let mut ranked: Vec<&ScoreRecord> = ledger.iter().collect();
    ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    ranked.iter().position(|r| r.id == id).map(|pos| pos + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    TotalScore,
    CompletedAt,
    Duration,
    CorrectAnswers,
}

impl SortField {
    /// Unknown values sort by total score.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("completedAt") => SortField::CompletedAt,
            Some("duration") => SortField::Duration,
            Some("correctAnswers") => SortField::CorrectAnswers,
            _ => SortField::TotalScore,
        }
    }

    fn compare(self, a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
        match self {
            SortField::TotalScore => a.total_score.total_cmp(&b.total_score),
            SortField::CompletedAt => a.completed_at.cmp(&b.completed_at),
            SortField::Duration => a.duration.cmp(&b.duration),
            SortField::CorrectAnswers => a.correct_answers.cmp(&b.correct_answers),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Absent means descending; anything other than `desc` is ascending.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("desc") => SortOrder::Desc,
            Some(_) => SortOrder::Asc,
        }
    }
}

/// Stable sort, so equal keys keep insertion order in both directions.
pub fn sort_scores(scores: &mut [ScoreRecord], field: SortField, order: SortOrder) {
    scores.sort_by(|a, b| {
        let ord = field.compare(a, b);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// Query parameters for the leaderboard.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScoreListParams {
    pub session_id: Option<String>,
    /// Defaults to 10; 0 also means the default.
    pub limit: Option<usize>,
    /// One of `totalScore`, `completedAt`, `duration`, `correctAnswers`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
}

/// Aggregates over the filtered ledger, before the limit is applied.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStatistics {
    pub total_players: usize,
    pub average_score: i64,
    pub highest_score: f64,
    pub perfect_scores: usize,
}

impl ScoreStatistics {
    pub fn from_records(scores: &[ScoreRecord]) -> Self {
        let total_players = scores.len();
        // f64 sums saturate to infinity instead of overflowing.
        let sum: f64 = scores.iter().map(|s| s.total_score).sum();
        let average_score = if total_players == 0 {
            0
        } else {
            round_half_up(sum / total_players as f64)
        };

        Self {
            total_players,
            average_score,
            highest_score: scores
                .iter()
                .map(|s| s.total_score)
                .max_by(f64::total_cmp)
                .unwrap_or(0.0),
            perfect_scores: scores
                .iter()
                .filter(|s| s.total_score == PERFECT_SCORE)
                .count(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreListResponse {
    pub scores: Vec<ScoreRecord>,
    pub statistics: ScoreStatistics,
}

impl ScoreListParams {
    /// Sorts, aggregates and truncates an already session-filtered ledger.
    pub fn apply(&self, mut scores: Vec<ScoreRecord>) -> ScoreListResponse {
        let statistics = ScoreStatistics::from_records(&scores);

        sort_scores(
            &mut scores,
            SortField::from_param(self.sort_by.as_deref()),
            SortOrder::from_param(self.order.as_deref()),
        );
        scores.truncate(self.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIST_LIMIT));

        ScoreListResponse { scores, statistics }
    }
}

/// Which ledger rows a delete removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSelector {
    Id(i64),
    Session(String),
}

/// Query parameters for deleting scores.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteScoresParams {
    pub session_id: Option<String>,
    /// Takes precedence over `sessionId` when both are given.
    pub score_id: Option<i64>,
}

impl DeleteScoresParams {
    pub fn selector(self) -> Result<ScoreSelector, AppError> {
        match (self.score_id, self.session_id.filter(|s| !s.is_empty())) {
            (Some(id), _) => Ok(ScoreSelector::Id(id)),
            (None, Some(session)) => Ok(ScoreSelector::Session(session)),
            (None, None) => Err(AppError::BadRequest(
                "Either sessionId or scoreId is required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScoresResponse {
    pub deleted_count: usize,
}

/// Two sample leaderboard rows for demos.
pub fn demo_scores() -> Vec<NewScore> {
    let at = |h, m| {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0)
            .single()
            .unwrap_or_default()
    };

    vec![
        NewScore {
            session_id: "demo-session-1".to_string(),
            player_name: "Ahmad".to_string(),
            total_questions: 5,
            correct_answers: 4,
            total_score: 85.0,
            duration: 120,
            difficulty: "easy".to_string(),
            completed_at: at(10, 30),
            answers: Vec::new(),
        },
        NewScore {
            session_id: "demo-session-2".to_string(),
            player_name: "Sari".to_string(),
            total_questions: 5,
            correct_answers: 5,
            total_score: 100.0,
            duration: 95,
            difficulty: "easy".to_string(),
            completed_at: at(11, 15),
            answers: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn score(id: i64, session: &str, total_score: f64) -> ScoreRecord {
        NewScore {
            session_id: session.to_string(),
            player_name: ANONYMOUS_PLAYER.to_string(),
            total_questions: 5,
            correct_answers: 3,
            total_score,
            duration: 100 - id,
            difficulty: "easy".to_string(),
            completed_at: Utc::now() + Duration::seconds(id),
            answers: Vec::new(),
        }
        .with_id(id)
    }

    fn request() -> SubmitScoreRequest {
        SubmitScoreRequest {
            session_id: Some("s1".to_string()),
            player_name: None,
            total_questions: Some(5),
            correct_answers: Some(4),
            total_score: Some(85.0),
            duration: None,
            difficulty: None,
            answers: None,
        }
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::for_score(95.0), Grade::A);
        assert_eq!(Grade::for_score(85.0), Grade::B);
        assert_eq!(Grade::for_score(75.0), Grade::C);
        assert_eq!(Grade::for_score(65.0), Grade::D);
    }

    #[test]
    fn grade_boundaries_are_inclusive() {
        assert_eq!(Grade::for_score(90.0), Grade::A);
        assert_eq!(Grade::for_score(89.99), Grade::B);
        assert_eq!(Grade::for_score(80.0), Grade::B);
        assert_eq!(Grade::for_score(70.0), Grade::C);
        assert_eq!(Grade::for_score(69.5), Grade::D);
    }

    #[test]
    fn fractional_total_score_is_accepted() {
        let mut req = request();
        req.total_score = Some(87.5);
        let record = req.into_new_score(Utc::now()).unwrap().with_id(1);
        assert_eq!(record.total_score, 87.5);
        assert_eq!(record.grade, Grade::B);
    }

    #[test]
    fn negative_total_score_is_rejected() {
        let mut req = request();
        req.total_score = Some(-0.5);
        assert!(matches!(
            req.into_new_score(Utc::now()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn record_derives_accuracy_and_grade() {
        let record = request().into_new_score(Utc::now()).unwrap().with_id(1);
        assert_eq!(record.accuracy, 80);
        assert_eq!(record.grade, Grade::B);
        assert_eq!(record.player_name, ANONYMOUS_PLAYER);
        assert_eq!(record.difficulty, "easy");
        assert_eq!(record.duration, 0);
        assert!(record.answers.is_empty());
    }

    #[test]
    fn rejects_more_correct_than_total() {
        let mut req = request();
        req.total_questions = Some(5);
        req.correct_answers = Some(6);
        assert!(matches!(
            req.into_new_score(Utc::now()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let mut req = request();
        req.total_score = None;
        assert!(req.into_new_score(Utc::now()).is_err());

        let mut req = request();
        req.session_id = Some(String::new());
        assert!(req.into_new_score(Utc::now()).is_err());

        let mut req = request();
        req.total_questions = Some(0);
        req.correct_answers = Some(0);
        assert!(req.into_new_score(Utc::now()).is_err());
    }

    #[test]
    fn zero_correct_answers_is_accepted() {
        let mut req = request();
        req.correct_answers = Some(0);
        req.total_score = Some(0.0);
        let record = req.into_new_score(Utc::now()).unwrap().with_id(1);
        assert_eq!(record.accuracy, 0);
        assert_eq!(record.grade, Grade::D);
    }

    #[test]
    fn first_submission_is_personal_best() {
        let ledger = vec![score(1, "other", 100.0), score(2, "s1", 40.0)];
        assert!(is_personal_best(&ledger, &ledger[1]));
    }

    #[test]
    fn personal_best_requires_strict_improvement() {
        let ledger = vec![score(1, "s1", 80.0), score(2, "s1", 80.0), score(3, "s1", 81.0)];
        assert!(!is_personal_best(&ledger, &ledger[1]));
        assert!(is_personal_best(&ledger, &ledger[2]));
    }

    #[test]
    fn lower_second_submission_is_not_personal_best() {
        let ledger = vec![score(1, "s1", 90.0), score(2, "s1", 70.0)];
        assert!(!is_personal_best(&ledger, &ledger[1]));
    }

    #[test]
    fn global_rank_orders_by_score() {
        let ledger = vec![score(1, "a", 85.0), score(2, "b", 100.0), score(3, "c", 90.0)];
        assert_eq!(global_rank(&ledger, 2), Some(1));
        assert_eq!(global_rank(&ledger, 3), Some(2));
        assert_eq!(global_rank(&ledger, 1), Some(3));
        assert_eq!(global_rank(&ledger, 99), None);
    }

    #[test]
    fn global_rank_ties_keep_insertion_order() {
        let ledger = vec![score(1, "a", 80.0), score(2, "b", 80.0)];
        assert_eq!(global_rank(&ledger, 1), Some(1));
        assert_eq!(global_rank(&ledger, 2), Some(2));
    }

    #[test]
    fn sort_descending_then_ascending() {
        let mut scores = vec![score(1, "a", 70.0), score(2, "b", 95.0), score(3, "c", 80.0)];

        sort_scores(&mut scores, SortField::TotalScore, SortOrder::Desc);
        let desc: Vec<f64> = scores.iter().map(|s| s.total_score).collect();
        assert_eq!(desc, vec![95.0, 80.0, 70.0]);

        sort_scores(&mut scores, SortField::TotalScore, SortOrder::Asc);
        let asc: Vec<f64> = scores.iter().map(|s| s.total_score).collect();
        assert_eq!(asc, vec![70.0, 80.0, 95.0]);
    }

    #[test]
    fn sort_by_other_fields() {
        let mut scores = vec![score(1, "a", 70.0), score(2, "b", 95.0), score(3, "c", 80.0)];

        sort_scores(&mut scores, SortField::CompletedAt, SortOrder::Desc);
        assert_eq!(scores.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        // duration is 100 - id
        sort_scores(&mut scores, SortField::Duration, SortOrder::Asc);
        assert_eq!(scores.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn sort_params_fall_back() {
        assert_eq!(SortField::from_param(None), SortField::TotalScore);
        assert_eq!(SortField::from_param(Some("bogus")), SortField::TotalScore);
        assert_eq!(SortField::from_param(Some("duration")), SortField::Duration);
        assert_eq!(SortOrder::from_param(None), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Asc);
    }

    #[test]
    fn statistics_cover_the_unlimited_set() {
        let scores: Vec<ScoreRecord> = (1..=12).map(|i| score(i, "s", if i == 12 { 100.0 } else { 50.0 })).collect();
        let params = ScoreListParams::default();
        let result = params.apply(scores);

        assert_eq!(result.scores.len(), DEFAULT_LIST_LIMIT);
        assert_eq!(result.statistics.total_players, 12);
        assert_eq!(result.statistics.highest_score, 100.0);
        assert_eq!(result.statistics.perfect_scores, 1);
        // (11 * 50 + 100) / 12 = 54.17
        assert_eq!(result.statistics.average_score, 54);
        assert_eq!(result.scores[0].total_score, 100.0);
    }

    #[test]
    fn statistics_of_empty_ledger_are_zero() {
        let stats = ScoreStatistics::from_records(&[]);
        assert_eq!(stats, ScoreStatistics {
            total_players: 0,
            average_score: 0,
            highest_score: 0.0,
            perfect_scores: 0,
        });
    }

    #[test]
    fn statistics_survive_huge_scores() {
        let scores = vec![score(1, "a", 9e18), score(2, "b", 9e18)];
        let stats = ScoreStatistics::from_records(&scores);
        assert_eq!(stats.total_players, 2);
        assert_eq!(stats.highest_score, 9e18);
        assert_eq!(stats.average_score, 9_000_000_000_000_000_000);
        assert_eq!(stats.perfect_scores, 0);
    }

    #[test]
    fn fractional_scores_sort_and_aggregate() {
        let mut scores = vec![score(1, "a", 87.5), score(2, "b", 87.25), score(3, "c", 100.0)];
        let stats = ScoreStatistics::from_records(&scores);
        assert_eq!(stats.highest_score, 100.0);
        assert_eq!(stats.perfect_scores, 1);
        // 274.75 / 3 = 91.58
        assert_eq!(stats.average_score, 92);

        sort_scores(&mut scores, SortField::TotalScore, SortOrder::Asc);
        assert_eq!(scores.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        assert_eq!(global_rank(&scores, 1), Some(2));
    }

    #[test]
    fn delete_selector_prefers_score_id() {
        let params = DeleteScoresParams {
            session_id: Some("s1".to_string()),
            score_id: Some(3),
        };
        assert_eq!(params.selector().unwrap(), ScoreSelector::Id(3));

        let params = DeleteScoresParams {
            session_id: Some("s1".to_string()),
            score_id: None,
        };
        assert_eq!(params.selector().unwrap(), ScoreSelector::Session("s1".to_string()));

        assert!(DeleteScoresParams::default().selector().is_err());
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(score(1, "s1", 85.0)).unwrap();
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["totalScore"], 85.0);
        assert_eq!(json["grade"], "B");
        assert!(json.get("completedAt").is_some());
    }
}
