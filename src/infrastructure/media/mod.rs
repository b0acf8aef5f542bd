//! External media tool capability (ffmpeg).

pub mod ffmpeg;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code}: {detail}")]
    Failed {
        program: String,
        code: i32,
        detail: String,
    },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
}

/// Runs one invocation of the media tool and waits for it to exit.
#[async_trait]
pub trait MediaTool: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<(), ToolError>;
}
