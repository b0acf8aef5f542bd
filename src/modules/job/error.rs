use crate::infrastructure::media::ToolError;
use crate::infrastructure::storage::StorageError;
use thiserror::Error;

/// Every way a job can fail. `Display` is the message returned to the caller.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Server is misconfigured. Missing R2 environment variables.")]
    Misconfigured,

    #[error("Missing 'source_video_key' in job input.")]
    MissingSourceKey,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
