use crate::infrastructure::storage::{ObjectStorage, StorageError};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedArtifacts {
    pub transcoded_key: String,
    pub thumbnail_keys: Vec<String>,
}

/// `processed/<job_id>`, shared by every artifact of one job.
pub fn output_prefix(job_id: Uuid) -> String {
    format!("processed/{}", job_id)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Uploads the transcoded video, then each thumbnail in order.
///
/// Stops at the first failed upload. Objects already written stay in the bucket.
pub async fn publish(
    storage: &dyn ObjectStorage,
    job_id: Uuid,
    transcoded: &Path,
    thumbnails: &[PathBuf],
) -> Result<PublishedArtifacts, StorageError> {
    let prefix = output_prefix(job_id);

    let transcoded_key = format!("{}/{}", prefix, file_name(transcoded));
    info!(job_id = %job_id, key = %transcoded_key, "⬆️ Uploading transcoded video");
    storage.upload(transcoded, &transcoded_key).await?;

    let mut thumbnail_keys = Vec::with_capacity(thumbnails.len());
    for thumb in thumbnails {
        let key = format!("{}/thumbnails/{}", prefix, file_name(thumb));
        info!(job_id = %job_id, key = %key, "⬆️ Uploading thumbnail");
        storage.upload(thumb, &key).await?;
        thumbnail_keys.push(key);
    }

    info!(job_id = %job_id, "All uploads complete");
    Ok(PublishedArtifacts {
        transcoded_key,
        thumbnail_keys,
    })
}
