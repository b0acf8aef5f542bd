use crate::modules::job::error::JobError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;

/// Turns a job's thumbnails into structured metadata for the response.
///
/// Implementations must accept an empty thumbnail list.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, thumbnails: &[PathBuf]) -> Result<serde_json::Value, JobError>;
}

#[derive(Debug, Serialize)]
struct PendingAnalysis {
    status: &'static str,
    message: &'static str,
}

/// Stand-in until a real model is wired up; ignores its input.
pub struct PlaceholderAnalyzer;

#[async_trait]
impl Analyzer for PlaceholderAnalyzer {
    async fn analyze(&self, _thumbnails: &[PathBuf]) -> Result<serde_json::Value, JobError> {
        tracing::debug!("AI analysis placeholder: not implemented yet");

        serde_json::to_value(PendingAnalysis {
            status: "pending",
            message: "AI analysis will be implemented in the future.",
        })
        .map_err(|e| JobError::Analysis(e.to_string()))
    }
}
