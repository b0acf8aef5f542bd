use crate::docs::ApiDoc;
use crate::state::AppState;
use axum::{Json, Router};
use utoipa::OpenApi;

pub fn configure_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api/v1", api_routes().merge(crate::modules::job::router()))
}

fn api_routes() -> Router<AppState> {
    Router::new().route("/health", axum::routing::get(|| async { "ok" }))
}
