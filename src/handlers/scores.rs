// src/handlers/scores.rs

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
use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        response::ApiResponse,
        score::{
            DeleteScoresParams, DeleteScoresResponse, ScoreListParams, ScoreListResponse,
            SubmitScoreRequest, SubmitScoreResponse, global_rank, is_personal_best,
        },
    },
    store::ScoreStore,
};

/// Leaderboard: sorted, limited scores plus statistics over every matching score.
#[utoipa::path(
    get,
    path = "/api/scores",
    tag = "scores",
    params(ScoreListParams),
    responses((status = 200, description = "Scores and statistics", body = ScoreListResponse))
)]
pub async fn list_scores(
    State(scores): State<Arc<dyn ScoreStore>>,
    params: Result<Query<ScoreListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let session_id = params.session_id.as_deref().filter(|s| !s.is_empty());

    let listing = params.apply(scores.query(session_id).await?);

    Ok(Json(
        ApiResponse::ok(listing).with_message("Scores retrieved successfully"),
    ))
}

/// Records a finished quiz.
///
/// * Derives accuracy and grade.
/// * Reports whether this is the session's best so far and its global rank.
#[utoipa::path(
    post,
    path = "/api/scores",
    tag = "scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 201, description = "Stored score with rank", body = SubmitScoreResponse),
        (status = 400, description = "Missing fields or correctAnswers > totalQuestions")
    )
)]
pub async fn submit_score(
    State(scores): State<Arc<dyn ScoreStore>>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let draft = payload.into_new_score(Utc::now())?;

    let record = scores.insert(draft).await?;
    let ledger = scores.query(None).await?;

    let is_personal_best = is_personal_best(&ledger, &record);
    let global_rank = global_rank(&ledger, record.id).ok_or_else(|| {
        AppError::InternalServerError(format!("Score {} missing after insert", record.id))
    })?;

    tracing::info!(
        "Saved score {} for session {}: {} (rank {}, personal best: {})",
        record.id,
        record.session_id,
        record.total_score,
        global_rank,
        is_personal_best
    );

    let response = SubmitScoreResponse {
        record,
        is_personal_best,
        global_rank,
        total_players: ledger.len(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(response).with_message("Score saved successfully")),
    ))
}

/// Deletes one score by id, or every score of a session.
/// A delete that matches nothing answers 404 with `deletedCount: 0`.
#[utoipa::path(
    delete,
    path = "/api/scores",
    tag = "scores",
    params(DeleteScoresParams),
    responses(
        (status = 200, description = "Scores deleted", body = DeleteScoresResponse),
        (status = 400, description = "Neither sessionId nor scoreId given"),
        (status = 404, description = "No scores matched", body = DeleteScoresResponse)
    )
)]
pub async fn delete_scores(
    State(scores): State<Arc<dyn ScoreStore>>,
    params: Result<Query<DeleteScoresParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let selector = params.selector()?;

    let deleted_count = scores.delete(&selector).await?;

    if deleted_count == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::unsuccessful(
                DeleteScoresResponse { deleted_count },
                "No scores found to delete",
            )),
        ));
    }

    tracing::info!("Deleted {} score(s) matching {:?}", deleted_count, selector);

    Ok((
        StatusCode::OK,
        Json(
            ApiResponse::ok(DeleteScoresResponse { deleted_count })
                .with_message(format!("{} score(s) deleted successfully", deleted_count)),
        ),
    ))
}
