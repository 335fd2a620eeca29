use serde::Deserialize;
use serde_json::Value;

use crate::extract::PlayInfo;
use crate::{ItemError, StreamKind};

/// One candidate stream. Quality and codec fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDescriptor {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub backup_url: Option<BackupUrls>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BackupUrls {
    Many(Vec<String>),
    One(String),
}

impl StreamDescriptor {
    /// First backup address when the backup list is non-empty, else the base address.
    pub fn resolve(&self) -> Option<&str> {
        let backup = match &self.backup_url {
            Some(BackupUrls::Many(urls)) => urls.first().map(String::as_str),
            Some(BackupUrls::One(url)) if !url.is_empty() => Some(url.as_str()),
            _ => None,
        };
        backup
            .or(self.base_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStreams {
    pub video_url: String,
    pub audio_url: String,
}

/// Picks the first video and first audio descriptor of the dash group.
pub fn select_streams(id: &str, info: &PlayInfo) -> Result<SelectedStreams, ItemError> {
    let dash = info.data().get("dash").filter(|dash| !is_empty(dash)).ok_or_else(|| {
        ItemError::UnsupportedFormat { id: id.to_string() }
    })?;

    let video = first_descriptor(dash, "video");
    let audio = first_descriptor(dash, "audio");
    let missing = |stream| ItemError::MissingStream {
        id: id.to_string(),
        stream,
    };
    let (video, audio) = match (video, audio) {
        (Some(video), Some(audio)) => (video, audio),
        (None, _) => return Err(missing(StreamKind::Video)),
        (_, None) => return Err(missing(StreamKind::Audio)),
    };

    let video_url = video.resolve().ok_or_else(|| missing(StreamKind::Video))?;
    let audio_url = audio.resolve().ok_or_else(|| missing(StreamKind::Audio))?;
    Ok(SelectedStreams {
        video_url: video_url.to_string(),
        audio_url: audio_url.to_string(),
    })
}

fn first_descriptor(dash: &Value, key: &str) -> Option<StreamDescriptor> {
    let first = dash.get(key)?.as_array()?.first()?;
    // A malformed descriptor has no usable address.
    Some(StreamDescriptor::deserialize(first).unwrap_or_default())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
