// src/handlers/questions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        question::{CreateQuestionRequest, PublicQuestion, QuestionListParams},
        response::ApiResponse,
    },
    store::QuestionStore,
};

/// Lists questions, optionally filtered by category and difficulty.
/// The answer key is never included.
#[utoipa::path(
    get,
    path = "/api/questions",
    tag = "questions",
    params(QuestionListParams),
    responses(
        (status = 200, description = "Questions without answer keys", body = Vec<PublicQuestion>),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn list_questions(
    State(questions): State<Arc<dyn QuestionStore>>,
    params: Result<Query<QuestionListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    let selected: Vec<PublicQuestion> = params
        .apply(questions.all().await?)
        .into_iter()
        .map(PublicQuestion::from)
        .collect();
    let total = selected.len();

    Ok(Json(
        ApiResponse::ok(selected)
            .with_total(total)
            .with_message("Questions retrieved successfully"),
    ))
}

/// Adds a question to the catalog for the lifetime of the process.
#[utoipa::path(
    post,
    path = "/api/questions",
    tag = "questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Stored question without its answer key", body = PublicQuestion),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn create_question(
    State(questions): State<Arc<dyn QuestionStore>>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let draft = payload.into_new_question()?;

    let question = questions.insert(draft).await?;
    tracing::info!(
        "Added question {} ({}/{})",
        question.id,
        question.category,
        question.difficulty
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PublicQuestion::from(question)).with_message("Question added successfully")),
    ))
}
