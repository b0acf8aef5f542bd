use crate::infrastructure::media::MediaTool;
use crate::modules::job::error::JobError;
use std::path::{Path, PathBuf};
use tracing::info;

pub const THUMBNAIL_PREFIX: &str = "thumb_";
pub const THUMBNAIL_EXTENSION: &str = ".jpg";
/// One frame every 10 seconds.
pub const SAMPLE_FILTER: &str = "fps=1/10";
pub const JPEG_QUALITY: &str = "3";

pub fn thumbnail_args(input: &Path, output_dir: &Path) -> Vec<String> {
    let pattern = output_dir.join(format!("{}%03d{}", THUMBNAIL_PREFIX, THUMBNAIL_EXTENSION));
    vec![
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vf".into(),
        SAMPLE_FILTER.into(),
        "-q:v".into(),
        JPEG_QUALITY.into(),
        pattern.to_string_lossy().into_owned(),
    ]
}

/// Index embedded in `thumb_<digits>.jpg`, `None` for any other name.
fn thumbnail_index(file_name: &str) -> Option<u32> {
    let digits = file_name
        .strip_prefix(THUMBNAIL_PREFIX)?
        .strip_suffix(THUMBNAIL_EXTENSION)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Thumbnails in `dir`, in capture order.
pub async fn collect_thumbnails(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if let Some(index) = name.to_str().and_then(thumbnail_index) {
            found.push((index, entry.path()));
        }
    }
    found.sort_by_key(|(index, _)| *index);
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Samples `input` into `output_dir`. An empty list is a valid result for short clips.
pub async fn extract_thumbnails(
    tool: &dyn MediaTool,
    input: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, JobError> {
    info!("Generating thumbnails for {}", input.display());
    tool.run(&thumbnail_args(input, output_dir)).await?;

    let thumbnails = collect_thumbnails(output_dir).await?;
    info!(count = thumbnails.len(), "Generated {} thumbnails", thumbnails.len());
    Ok(thumbnails)
}
