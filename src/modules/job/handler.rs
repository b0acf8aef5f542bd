use super::dto::{JobEnvelope, JobResponse};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::IntoResponse,
};
use tracing::warn;

/// Run a media job and wait for its result
///
/// Always answers 200 with either the success or the error shape.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = JobEnvelope,
    responses(
        (status = 200, description = "Job result (success or error shape)", body = JobResponse)
    ),
    tag = "Jobs"
)]
pub async fn run_job(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected job body: {}", e);
            return JobResponse::error(format!("Invalid job payload: {}", e));
        }
    };

    let envelope: JobEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Rejected job payload: {}", e);
            return JobResponse::error(format!("Invalid job payload: {}", e));
        }
    };

    state.orchestrator.run(&envelope.input).await
}
