use crate::modules::job::dto::JobResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failed jobs are still a well-formed answer, so both shapes go out as 200.
impl IntoResponse for JobResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
