use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct JobRequest {
    /// Object-storage key of the source video, e.g. `videos/clip.mov`.
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub source_video_key: Option<String>,
}

#[cfg(test)]
impl JobRequest {
    pub fn new(source_video_key: impl Into<String>) -> Self {
        Self {
            source_video_key: Some(source_video_key.into()),
        }
    }
}

/// What the hosting boundary delivers: an optional caller id plus the job input.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JobEnvelope {
    #[serde(default)]
    pub id: Option<String>,
    pub input: JobRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobSuccess {
    /// Always `"success"`.
    pub status: String,
    pub transcoded_video_key: String,
    pub thumbnail_keys: Vec<String>,
    #[schema(value_type = Object)]
    pub ai_analysis: serde_json::Value,
    pub public_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobFailure {
    pub error: String,
}

/// Exactly one of the two job output shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum JobResponse {
    Success(JobSuccess),
    Error(JobFailure),
}

impl JobResponse {
    pub fn error(message: impl Into<String>) -> Self {
        JobResponse::Error(JobFailure {
            error: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobResponse::Success(_))
    }
}

/// Reply published on the result queue.
#[derive(Debug, Serialize)]
pub struct JobResultMessage {
    pub id: Option<String>,
    pub output: JobResponse,
}
