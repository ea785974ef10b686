// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{answers, docs, questions, scores},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the question, answer and score endpoints under `/api`.
/// * Applies global middleware (Trace, CORS).
/// * Injects the shared stores.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route(
            "/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/answers",
            get(answers::answer_statistics).post(answers::check_answer),
        )
        .route(
            "/scores",
            get(scores::list_scores)
                .post(scores::submit_score)
                .delete(scores::delete_scores),
        )
        .route("/openapi.json", get(docs::openapi_json));

    Router::new()
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
