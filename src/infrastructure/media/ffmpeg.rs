use super::{MediaTool, ToolError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

pub struct Ffmpeg {
    program: String,
    timeout: Option<Duration>,
}

impl Ffmpeg {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-hide_banner", "-y"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl MediaTool for Ffmpeg {
    async fn run(&self, args: &[String]) -> Result<(), ToolError> {
        debug!(program = %self.program, ?args, "Running media tool");

        let child = self.command(args).spawn().map_err(|source| ToolError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let wait = child.wait_with_output();
        let output = match self.timeout {
            // Dropping the future kills the child (kill_on_drop).
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| ToolError::TimedOut {
                    program: self.program.clone(),
                    secs: limit.as_secs(),
                })?,
            None => wait.await,
        }
        .map_err(|source| ToolError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if output.status.success() {
            return Ok(());
        }

        let detail = last_stderr_line(&String::from_utf8_lossy(&output.stderr));

        Err(ToolError::Failed {
            program: self.program.clone(),
            code: output.status.code().unwrap_or(-1),
            detail,
        })
    }
}

const MAX_DETAIL_CHARS: usize = 300;

/// Last non-blank stderr line. ffmpeg separates progress updates with `\r`, so both
/// separators count, and the result is capped.
fn last_stderr_line(stderr: &str) -> String {
    let line = stderr
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or("no output");

    match line.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}
