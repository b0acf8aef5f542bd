//! In-process doubles for the storage and media-tool capabilities.

use crate::infrastructure::media::{MediaTool, ToolError};
use crate::infrastructure::storage::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bucket backed by a map. Uploads are recorded by key in call order.
#[derive(Default)]
pub struct MemoryStorage {
    objects: HashMap<String, Vec<u8>>,
    fail_pattern: Option<String>,
    downloads: AtomicUsize,
    uploads: Mutex<Vec<String>>,
}

impl MemoryStorage {
    pub fn with_object(mut self, key: &str, data: &[u8]) -> Self {
        self.objects.insert(key.to_string(), data.to_vec());
        self
    }

    /// Any upload whose key contains `pattern` fails.
    pub fn fail_uploads_matching(mut self, pattern: &str) -> Self {
        self.fail_pattern = Some(pattern.to_string());
        self
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn download(&self, key: &str, local_path: &Path) -> StorageResult<()> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let data = self
            .objects
            .get(key)
            .ok_or_else(|| StorageError::DownloadFailed(format!("NoSuchKey: {}", key)))?;
        tokio::fs::write(local_path, data).await?;
        Ok(())
    }

    async fn upload(&self, _local_path: &Path, key: &str) -> StorageResult<()> {
        if let Some(pattern) = &self.fail_pattern {
            if key.contains(pattern.as_str()) {
                return Err(StorageError::UploadFailed(format!(
                    "AccessDenied: {}",
                    key
                )));
            }
        }
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Pretends to be ffmpeg: the transcode profile writes its output file, the
/// thumbnail profile writes `thumbnails` numbered images next to its pattern.
pub struct FakeTool {
    thumbnails: usize,
    fail_transcode: bool,
    fail_thumbnails: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeTool {
    pub fn with_thumbnails(thumbnails: usize) -> Self {
        Self {
            thumbnails,
            fail_transcode: false,
            fail_thumbnails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_transcode() -> Self {
        Self {
            fail_transcode: true,
            ..Self::with_thumbnails(1)
        }
    }

    pub fn failing_thumbnails() -> Self {
        Self {
            fail_thumbnails: true,
            ..Self::with_thumbnails(1)
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn failure() -> ToolError {
        ToolError::Failed {
            program: "ffmpeg".to_string(),
            code: 1,
            detail: "Invalid data found when processing input".to_string(),
        }
    }
}

#[async_trait]
impl MediaTool for FakeTool {
    async fn run(&self, args: &[String]) -> Result<(), ToolError> {
        self.calls.lock().unwrap().push(args.to_vec());

        let output = Path::new(args.last().map(String::as_str).unwrap_or_default());
        let is_thumbnail_profile = args.iter().any(|a| a == "-vf");

        if is_thumbnail_profile {
            if self.fail_thumbnails {
                return Err(Self::failure());
            }
            let dir = output.parent().unwrap_or(Path::new("."));
            for i in 1..=self.thumbnails {
                tokio::fs::write(dir.join(format!("thumb_{:03}.jpg", i)), b"jpeg")
                    .await
                    .map_err(|source| ToolError::Spawn {
                        program: "ffmpeg".to_string(),
                        source,
                    })?;
            }
        } else {
            if self.fail_transcode {
                return Err(Self::failure());
            }
            tokio::fs::write(output, b"mp4")
                .await
                .map_err(|source| ToolError::Spawn {
                    program: "ffmpeg".to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}
