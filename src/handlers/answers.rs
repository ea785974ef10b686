// src/handlers/answers.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    config::Config,
    error::AppError,
    models::{
        answer::{
            ANONYMOUS_SESSION, AnswerStatistics, AnswerStatsParams, EvaluateRequest,
            EvaluateResponse, NewAnswerRecord, evaluate,
        },
        question::find_question,
        response::ApiResponse,
    },
    store::{AnswerStore, QuestionStore},
};

/// Checks one answer and records it in the answer history.
///
/// * `selectedAnswer` must be present; `null` means the countdown ran out.
/// * Correct answers score 10 plus one point per 3 seconds left.
#[utoipa::path(
    post,
    path = "/api/answers",
    tag = "answers",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Evaluation result", body = EvaluateResponse),
        (status = 400, description = "Missing questionId or selectedAnswer"),
        (status = 404, description = "Question not found")
    )
)]
pub async fn check_answer(
    State(questions): State<Arc<dyn QuestionStore>>,
    State(answers): State<Arc<dyn AnswerStore>>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let (Some(question_id), Some(selected)) = (req.question_id, req.selected_answer) else {
        return Err(AppError::BadRequest(
            "Missing required fields: questionId and selectedAnswer".to_string(),
        ));
    };

    let time_remaining = req.time_remaining.unwrap_or(0);
    if time_remaining < 0 {
        return Err(AppError::BadRequest(
            "timeRemaining cannot be negative".to_string(),
        ));
    }

    let catalog = questions.all().await?;
    let question = find_question(&catalog, question_id)
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let result = evaluate(question, selected, time_remaining);
    let session_id = req
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ANONYMOUS_SESSION.to_string());

    answers
        .insert(NewAnswerRecord {
            session_id,
            question_id,
            selected_answer: selected,
            correct_answer: question.correct,
            is_correct: result.is_correct,
            score: result.score,
            time_remaining,
            timestamp: Utc::now(),
        })
        .await?;

    let message = if result.is_correct {
        "Correct answer!"
    } else {
        "Wrong answer!"
    };

    Ok(Json(ApiResponse::ok(result).with_message(message)))
}

/// Aggregates the answer history, optionally for a single session.
#[utoipa::path(
    get,
    path = "/api/answers",
    tag = "answers",
    params(AnswerStatsParams),
    responses((status = 200, description = "Answer statistics", body = AnswerStatistics))
)]
pub async fn answer_statistics(
    State(answers): State<Arc<dyn AnswerStore>>,
    State(config): State<Config>,
    params: Result<Query<AnswerStatsParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let session_id = params.session_id.as_deref().filter(|s| !s.is_empty());

    let records = answers.query(session_id).await?;
    let stats = AnswerStatistics::from_records(records, config.question_time_limit_secs);

    Ok(Json(ApiResponse::ok(stats)))
}
