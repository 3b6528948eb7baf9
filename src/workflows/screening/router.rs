use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{RiskAssessment, Submission};
use super::service::{ScreeningService, ScreeningServiceError};
use super::session::{SessionError, SessionId};
use super::store::ResponseStore;

/// Labels keep the fixed academic, family, economic, psychosocial order.
#[derive(Debug, Serialize)]
struct ScoreResponse {
    session_id: SessionId,
    assessment: RiskAssessment,
}

/// Router builder exposing questionnaire intake, scoring, and session status.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>) -> Router
where
    S: ResponseStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/screening/sessions/:session_id/submission",
            post(submit_handler::<S>),
        )
        .route(
            "/api/v1/screening/sessions/:session_id/score",
            post(score_handler::<S>),
        )
        .route(
            "/api/v1/screening/sessions/:session_id",
            get(session_handler::<S>),
        )
        .with_state(service)
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Session(SessionError::InvalidTransition { .. }) => {
            StatusCode::CONFLICT
        }
        ScreeningServiceError::EmptyStore => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, "screening request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(submission): axum::Json<Submission>,
) -> Response
where
    S: ResponseStore + 'static,
{
    match service.submit(&SessionId(session_id), submission) {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: ResponseStore + 'static,
{
    let session_id = SessionId(session_id);
    match service.score_latest(&session_id) {
        Ok(assessment) => {
            let payload = ScoreResponse {
                session_id,
                assessment,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: ResponseStore + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}
