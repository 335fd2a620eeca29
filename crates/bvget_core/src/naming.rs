use std::path::{Path, PathBuf};

use crate::WorkItem;

/// Titles longer than this many characters are cut.
pub const MAX_TITLE_CHARS: usize = 100;

/// Where one item's files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Final merged file; its existence marks the item as done.
    pub output: PathBuf,
    /// Muxer target, renamed to `output` only after a successful merge.
    pub staging: PathBuf,
    pub temp_video: PathBuf,
    pub temp_audio: PathBuf,
}

impl ArtifactPaths {
    /// Every transient path, in removal order.
    pub fn temporaries(&self) -> [&Path; 3] {
        [&self.temp_video, &self.temp_audio, &self.staging]
    }
}

/// Output directory plus the file extensions used for each artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub output_dir: PathBuf,
    pub output_ext: String,
    pub video_ext: String,
    pub audio_ext: String,
}

impl ArtifactLayout {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_ext: "mp4".to_string(),
            video_ext: "mp4".to_string(),
            audio_ext: "mp3".to_string(),
        }
    }

    /// `<id>.<ext>` or `<id>_<sanitized title>.<ext>`.
    pub fn output_filename(&self, item: &WorkItem) -> String {
        match item.display_title() {
            Some(title) => format!("{}_{}.{}", item.id, sanitize_title(title), self.output_ext),
            None => format!("{}.{}", item.id, self.output_ext),
        }
    }

    pub fn paths_for(&self, item: &WorkItem) -> ArtifactPaths {
        let id = &item.id;
        ArtifactPaths {
            output: self.output_dir.join(self.output_filename(item)),
            staging: self
                .output_dir
                .join(format!("{id}_temp_out.{}", self.output_ext)),
            temp_video: self
                .output_dir
                .join(format!("{id}_temp_v.{}", self.video_ext)),
            temp_audio: self
                .output_dir
                .join(format!("{id}_temp_a.{}", self.audio_ext)),
        }
    }
}

/// Replaces `<>:"/\|?*` with `_` and keeps at most [`MAX_TITLE_CHARS`] characters.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect()
}

pub(crate) fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
