// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::handlers::{answers, questions, scores};
use crate::models::{
    answer::{AnswerRecord, AnswerStatistics, EvaluateRequest, EvaluateResponse},
    question::{CreateQuestionRequest, PublicQuestion},
    score::{
        DeleteScoresResponse, Grade, ScoreListResponse, ScoreRecord, ScoreStatistics,
        SubmitScoreRequest, SubmitScoreResponse,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Math Quiz API", description = "Questions, answer checking and leaderboard"),
    paths(
        questions::list_questions,
        questions::create_question,
        answers::check_answer,
        answers::answer_statistics,
        scores::list_scores,
        scores::submit_score,
        scores::delete_scores,
    ),
    components(schemas(
        PublicQuestion,
        CreateQuestionRequest,
        EvaluateRequest,
        EvaluateResponse,
        AnswerRecord,
        AnswerStatistics,
        Grade,
        ScoreRecord,
        ScoreStatistics,
        ScoreListResponse,
        SubmitScoreRequest,
        SubmitScoreResponse,
        DeleteScoresResponse,
    )),
    tags(
        (name = "questions", description = "Question catalog"),
        (name = "answers", description = "Answer checking and history"),
        (name = "scores", description = "Score ledger"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document describing every endpoint.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
