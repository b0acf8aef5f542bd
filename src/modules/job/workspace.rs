//! Per-job scratch directories under a shared temporary root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// An input and an output directory owned by one job.
///
/// Teardown runs exactly once: on [`Workspace::close`], or from `Drop` when
/// the handle goes away without being closed (panic, cancelled request).
#[derive(Debug)]
pub struct Workspace {
    job_id: Uuid,
    input_dir: PathBuf,
    output_dir: PathBuf,
    closed: bool,
}

impl Workspace {
    pub async fn open(root: &Path, job_id: Uuid) -> io::Result<Self> {
        let input_dir = root.join(format!("{}_input", job_id));
        let output_dir = root.join(format!("{}_output", job_id));

        // Built before creating anything so a failed second mkdir still cleans up the first.
        let workspace = Self {
            job_id,
            input_dir,
            output_dir,
            closed: false,
        };
        tokio::fs::create_dir_all(&workspace.input_dir).await?;
        tokio::fs::create_dir_all(&workspace.output_dir).await?;

        debug!(job_id = %job_id, "Workspace created under {}", root.display());
        Ok(workspace)
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Removes both directories on the blocking pool.
    pub async fn close(mut self) {
        self.closed = true;
        let job_id = self.job_id;
        let dirs = [self.input_dir.clone(), self.output_dir.clone()];

        let pending = dirs.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || remove_dirs(job_id, &pending)).await {
            warn!(job_id = %job_id, "Cleanup task failed ({}), removing inline", e);
            remove_dirs(job_id, &dirs);
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            remove_dirs(self.job_id, &[self.input_dir.clone(), self.output_dir.clone()]);
        }
    }
}

fn remove_dirs(job_id: Uuid, dirs: &[PathBuf]) {
    for dir in dirs {
        if let Err(e) = remove_dir_contents(dir) {
            warn!(job_id = %job_id, "Failed to clean {}: {}", dir.display(), e);
        }
    }
    debug!(job_id = %job_id, "Workspace removed");
}

/// Removes every entry of `dir` and then `dir` itself. A missing `dir` is not an error.
fn remove_dir_contents(dir: &Path) -> io::Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let path = entry?.path();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }

    match fs::remove_dir(dir) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
