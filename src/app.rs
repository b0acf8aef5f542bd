use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

// Job envelopes are tiny; anything bigger is not a job.
pub const MAX_JOB_PAYLOAD: usize = 64 * 1024;

pub fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes()
        .layer(DefaultBodyLimit::max(MAX_JOB_PAYLOAD))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
