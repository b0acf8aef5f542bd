//! Job orchestration: download → transcode → thumbnails → analysis → publish → cleanup.

use super::analysis::Analyzer;
use super::dto::{JobRequest, JobResponse, JobSuccess};
use super::error::JobError;
use super::publisher::{self, output_prefix};
use super::thumbnailer;
use super::transcoder::{self, transcoded_filename};
use super::workspace::Workspace;
use crate::infrastructure::media::MediaTool;
use crate::infrastructure::storage::ObjectStorage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

/// Runs one job at a time per call; safe to share between concurrent jobs
/// because all per-job state lives in the [`Workspace`] and a fresh job id.
#[derive(Clone)]
pub struct JobOrchestrator {
    /// `None` when storage was not configured at startup.
    storage: Option<Arc<dyn ObjectStorage>>,
    tool: Arc<dyn MediaTool>,
    analyzer: Arc<dyn Analyzer>,
    work_dir: PathBuf,
    public_base_url: String,
}

impl JobOrchestrator {
    pub fn new(
        storage: Option<Arc<dyn ObjectStorage>>,
        tool: Arc<dyn MediaTool>,
        analyzer: Arc<dyn Analyzer>,
        work_dir: PathBuf,
        public_base_url: String,
    ) -> Self {
        Self {
            storage,
            tool,
            analyzer,
            work_dir,
            public_base_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.storage.is_some()
    }

    /// Never fails: every error becomes the `{error}` response.
    pub async fn run(&self, request: &JobRequest) -> JobResponse {
        match self.execute(request).await {
            Ok(success) => JobResponse::Success(success),
            Err(e) => {
                error!("❌ Job failed: {}", e);
                JobResponse::error(e.to_string())
            }
        }
    }

    async fn execute(&self, request: &JobRequest) -> Result<JobSuccess, JobError> {
        let storage = self.storage.as_deref().ok_or(JobError::Misconfigured)?;

        request.validate().map_err(|_| JobError::MissingSourceKey)?;
        let source_key = request
            .source_video_key
            .as_deref()
            .ok_or(JobError::MissingSourceKey)?;

        let job_id = Uuid::new_v4();
        info!(job_id = %job_id, source = %source_key, "📦 Processing job");

        let workspace = Workspace::open(&self.work_dir, job_id).await?;
        let result = self.process(storage, &workspace, source_key).await;

        info!(job_id = %job_id, "Cleaning up local files");
        workspace.close().await;
        result
    }

    async fn process(
        &self,
        storage: &dyn ObjectStorage,
        workspace: &Workspace,
        source_key: &str,
    ) -> Result<JobSuccess, JobError> {
        let job_id = workspace.job_id();
        let basename = source_key.rsplit('/').next().unwrap_or(source_key);
        let input_path = workspace.input_dir().join(basename);
        let transcoded_path = workspace.output_dir().join(transcoded_filename(source_key));

        info!(job_id = %job_id, key = %source_key, "⬇️ Downloading source video");
        storage.download(source_key, &input_path).await?;

        transcoder::transcode(self.tool.as_ref(), &input_path, &transcoded_path).await?;

        let thumbnails = thumbnailer::extract_thumbnails(
            self.tool.as_ref(),
            &transcoded_path,
            workspace.output_dir(),
        )
        .await?;

        let ai_analysis = self.analyzer.analyze(&thumbnails).await?;

        let published =
            publisher::publish(storage, job_id, &transcoded_path, &thumbnails).await?;

        info!(job_id = %job_id, thumbnails = published.thumbnail_keys.len(), "✅ Job completed");

        Ok(JobSuccess {
            status: "success".to_string(),
            transcoded_video_key: published.transcoded_key,
            thumbnail_keys: published.thumbnail_keys,
            ai_analysis,
            public_base_url: format!("{}/{}", self.public_base_url, output_prefix(job_id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::job::analysis::PlaceholderAnalyzer;
    use crate::test_support::{FakeTool, MemoryStorage};
    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    struct Harness {
        root: TempDir,
        storage: Arc<MemoryStorage>,
        tool: Arc<FakeTool>,
    }

    impl Harness {
        fn new(storage: MemoryStorage, tool: FakeTool) -> Self {
            Self {
                root: tempdir().unwrap(),
                storage: Arc::new(storage),
                tool: Arc::new(tool),
            }
        }

        fn orchestrator(&self) -> JobOrchestrator {
            JobOrchestrator::new(
                Some(self.storage.clone() as Arc<dyn ObjectStorage>),
                self.tool.clone(),
                Arc::new(PlaceholderAnalyzer),
                self.root.path().to_path_buf(),
                "https://cdn.example.com".to_string(),
            )
        }

        fn leftover_entries(&self) -> usize {
            std::fs::read_dir(self.root.path()).unwrap().count()
        }
    }

    fn success(response: JobResponse) -> JobSuccess {
        match response {
            JobResponse::Success(s) => s,
            JobResponse::Error(e) => panic!("expected success, got error: {}", e.error),
        }
    }

    fn error_message(response: JobResponse) -> String {
        match response {
            JobResponse::Error(e) => e.error,
            JobResponse::Success(s) => panic!("expected error, got {:?}", s),
        }
    }

    #[tokio::test]
    async fn test_successful_job_publishes_everything() {
        let h = Harness::new(
            MemoryStorage::default().with_object("videos/clip.mov", b"movie"),
            FakeTool::with_thumbnails(3),
        );

        let result = success(h.orchestrator().run(&JobRequest::new("videos/clip.mov")).await);

        let prefix = result
            .transcoded_video_key
            .strip_suffix("/clip_processed.mp4")
            .unwrap()
            .to_string();
        assert!(prefix.starts_with("processed/"));
        let job_id = prefix.trim_start_matches("processed/");
        assert!(Uuid::parse_str(job_id).is_ok());

        assert_eq!(result.status, "success");
        assert_eq!(
            result.thumbnail_keys,
            (1..=3)
                .map(|i| format!("{prefix}/thumbnails/thumb_{i:03}.jpg"))
                .collect::<Vec<_>>()
        );
        assert_eq!(result.ai_analysis["status"], json!("pending"));
        assert_eq!(result.public_base_url, format!("https://cdn.example.com/{prefix}"));
        assert_eq!(h.storage.uploaded_keys().len(), 4);
        assert_eq!(h.storage.download_count(), 1);
        assert_eq!(h.tool.invocations(), 2);
        assert_eq!(h.leftover_entries(), 0);
    }

    #[tokio::test]
    async fn test_thumbnailer_reads_transcoded_file() {
        let h = Harness::new(
            MemoryStorage::default().with_object("in/a.mkv", b"movie"),
            FakeTool::with_thumbnails(1),
        );

        success(h.orchestrator().run(&JobRequest::new("in/a.mkv")).await);

        let calls = h.tool.calls();
        assert!(calls[0][1].ends_with("_input/a.mkv"));
        assert!(calls[1][1].ends_with("_output/a_processed.mp4"));
    }

    #[tokio::test]
    async fn test_zero_thumbnails_still_succeeds() {
        let h = Harness::new(
            MemoryStorage::default().with_object("short.mp4", b"x"),
            FakeTool::with_thumbnails(0),
        );

        let result = success(h.orchestrator().run(&JobRequest::new("short.mp4")).await);

        assert!(result.thumbnail_keys.is_empty());
        assert_eq!(h.storage.uploaded_keys().len(), 1);
        assert_eq!(h.leftover_entries(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_allocates_nothing() {
        let h = Harness::new(MemoryStorage::default(), FakeTool::with_thumbnails(1));

        let message = error_message(h.orchestrator().run(&JobRequest::default()).await);
        assert_eq!(message, "Missing 'source_video_key' in job input.");

        let message = error_message(h.orchestrator().run(&JobRequest::new("")).await);
        assert_eq!(message, "Missing 'source_video_key' in job input.");

        assert_eq!(h.leftover_entries(), 0);
        assert_eq!(h.storage.download_count(), 0);
    }

    #[tokio::test]
    async fn test_misconfigured_fails_every_job_without_io() {
        let root = tempdir().unwrap();
        let tool = Arc::new(FakeTool::with_thumbnails(1));
        let orchestrator = JobOrchestrator::new(
            None,
            tool.clone(),
            Arc::new(PlaceholderAnalyzer),
            root.path().to_path_buf(),
            "https://cdn.example.com".to_string(),
        );

        for request in [JobRequest::new("videos/clip.mov"), JobRequest::default()] {
            let message = error_message(orchestrator.run(&request).await);
            assert_eq!(
                message,
                "Server is misconfigured. Missing R2 environment variables."
            );
        }
        assert!(!orchestrator.is_configured());
        assert_eq!(tool.invocations(), 0);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_error_is_reported_verbatim() {
        let h = Harness::new(MemoryStorage::default(), FakeTool::with_thumbnails(1));

        let message = error_message(h.orchestrator().run(&JobRequest::new("videos/gone.mov")).await);

        assert_eq!(message, "NoSuchKey: videos/gone.mov");
        assert_eq!(h.tool.invocations(), 0);
        assert_eq!(h.leftover_entries(), 0);
    }

    #[tokio::test]
    async fn test_transcode_failure_uploads_nothing() {
        let h = Harness::new(
            MemoryStorage::default().with_object("videos/clip.mov", b"movie"),
            FakeTool::failing_transcode(),
        );

        let message = error_message(h.orchestrator().run(&JobRequest::new("videos/clip.mov")).await);

        assert!(message.contains("exited with status 1"), "{message}");
        assert!(h.storage.uploaded_keys().is_empty());
        assert_eq!(h.leftover_entries(), 0);
    }

    #[tokio::test]
    async fn test_thumbnail_failure_after_transcode_is_error_shape() {
        let h = Harness::new(
            MemoryStorage::default().with_object("videos/clip.mov", b"movie"),
            FakeTool::failing_thumbnails(),
        );

        let response = h.orchestrator().run(&JobRequest::new("videos/clip.mov")).await;

        assert!(!response.is_success());
        assert!(h.storage.uploaded_keys().is_empty());
        assert_eq!(h.leftover_entries(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_reports_error_and_keeps_partial_uploads() {
        let h = Harness::new(
            MemoryStorage::default()
                .with_object("videos/clip.mov", b"movie")
                .fail_uploads_matching("thumb_002.jpg"),
            FakeTool::with_thumbnails(3),
        );

        let message = error_message(h.orchestrator().run(&JobRequest::new("videos/clip.mov")).await);

        assert!(message.contains("thumb_002.jpg"));
        assert_eq!(h.storage.uploaded_keys().len(), 2);
        assert_eq!(h.leftover_entries(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_jobs_use_distinct_namespaces() {
        let h = Harness::new(
            MemoryStorage::default()
                .with_object("a/one.mov", b"1")
                .with_object("b/two.mov", b"2"),
            FakeTool::with_thumbnails(2),
        );
        let orchestrator = h.orchestrator();

        let (first, second) = (JobRequest::new("a/one.mov"), JobRequest::new("b/two.mov"));

        let (one, two) = tokio::join!(orchestrator.run(&first), orchestrator.run(&second));
        let (one, two) = (success(one), success(two));

        let prefix = |key: &str| key.rsplit_once('/').unwrap().0.to_string();
        assert_ne!(prefix(&one.transcoded_video_key), prefix(&two.transcoded_video_key));
        assert!(
            one.thumbnail_keys
                .iter()
                .all(|k| k.starts_with(&prefix(&one.transcoded_video_key)))
        );
        assert_eq!(h.storage.uploaded_keys().len(), 6);
        assert_eq!(h.leftover_entries(), 0);
    }
}
