use crate::infrastructure::media::{MediaTool, ToolError};
use std::path::Path;
use tracing::info;

pub const TRANSCODED_SUFFIX: &str = "_processed";
pub const TRANSCODED_EXTENSION: &str = "mp4";

/// `videos/clip.mov` -> `clip_processed.mp4`
pub fn transcoded_filename(source_key: &str) -> String {
    let basename = source_key.rsplit('/').next().unwrap_or(source_key);
    let stem = match basename.rfind('.') {
        Some(idx) if idx > 0 => &basename[..idx],
        _ => basename,
    };
    format!("{}{}.{}", stem, TRANSCODED_SUFFIX, TRANSCODED_EXTENSION)
}

/// H.264 + AAC 128k, moov atom moved to the front for progressive playback.
pub fn transcode_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "fast".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        "128k".into(),
        "-movflags".into(),
        "+faststart".into(),
        output.to_string_lossy().into_owned(),
    ]
}

pub async fn transcode(tool: &dyn MediaTool, input: &Path, output: &Path) -> Result<(), ToolError> {
    info!("🎥 Transcoding {} to {}", input.display(), output.display());
    tool.run(&transcode_args(input, output)).await?;
    info!("Transcoding complete");
    Ok(())
}
