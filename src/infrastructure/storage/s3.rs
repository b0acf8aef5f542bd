use super::{ObjectStorage, StorageError, StorageResult};
use crate::config::settings::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use std::path::Path;
use tracing::{debug, info};

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> Self {
        let endpoint = config.endpoint();
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "static",
        );

        let s3_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto")) // R2 ignores the region
            .endpoint_url(&endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(s3_config);

        info!(endpoint = %endpoint, bucket = %config.bucket, "✅ Object storage client ready");

        Self {
            client,
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for StorageService {
    async fn download(&self, key: &str, local_path: &Path) -> StorageResult<()> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(DisplayErrorContext(&e).to_string()))?;

        let mut reader = object.body.into_async_read();
        let mut file = tokio::fs::File::create(local_path).await?;
        let bytes = tokio::io::copy(&mut reader, &mut file).await?;

        debug!(key = %key, bytes, "Object written to {}", local_path.display());
        Ok(())
    }

    async fn upload(&self, local_path: &Path, key: &str) -> StorageResult<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", local_path.display(), e)))?;

        let content_type = mime_guess::from_path(local_path)
            .first_or_octet_stream()
            .to_string();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
