use crate::state::AppState;
use axum::Router;
use axum::routing::post;

pub mod analysis;
pub mod dto;
pub mod error;
pub mod handler;
pub mod publisher;
pub mod service;
pub mod thumbnailer;
pub mod transcoder;
pub mod workspace;

pub fn router() -> Router<AppState> {
    Router::new().route("/jobs", post(handler::run_job))
}
