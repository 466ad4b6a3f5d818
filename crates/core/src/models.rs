use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Kind of an elementary stream inside a media container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    /// Data, attachment and anything else the prober reports
    #[serde(other)]
    Other,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
            StreamKind::Other => "other",
        }
    }
}

impl FromStr for StreamKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "video" => StreamKind::Video,
            "audio" => StreamKind::Audio,
            "subtitle" => StreamKind::Subtitle,
            _ => StreamKind::Other,
        })
    }
}

/// One stream descriptor from a probe report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub kind: StreamKind,
    pub codec: String,
}

impl StreamInfo {
    pub fn new(kind: StreamKind, codec: impl Into<String>) -> Self {
        Self {
            kind,
            codec: codec.into(),
        }
    }
}

/// Structured description of a media item, as produced by an external prober
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Container format name (e.g. "mp3", "matroska,webm")
    pub container_format: String,
    /// Streams in the order the prober listed them
    pub streams: Vec<StreamInfo>,
}

impl ProbeReport {
    pub fn new(container_format: impl Into<String>, streams: Vec<StreamInfo>) -> Self {
        Self {
            container_format: container_format.into(),
            streams,
        }
    }

    /// First stream of the given kind; later streams of that kind are ignored
    pub fn primary(&self, kind: StreamKind) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.kind == kind)
    }

    pub fn primary_video(&self) -> Option<&StreamInfo> {
        self.primary(StreamKind::Video)
    }

    pub fn primary_audio(&self) -> Option<&StreamInfo> {
        self.primary(StreamKind::Audio)
    }

    /// Decode the JSON document printed by
    /// `ffprobe -show_format -show_streams -print_format json`
    pub fn from_ffprobe_json(json: &str) -> Result<Self> {
        let raw: FfprobeOutput = serde_json::from_str(json)?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: String,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    codec_type: String,
    #[serde(default)]
    codec_name: String,
}

impl From<FfprobeOutput> for ProbeReport {
    fn from(raw: FfprobeOutput) -> Self {
        let streams = raw
            .streams
            .into_iter()
            .map(|s| {
                // FromStr for StreamKind cannot fail
                let kind = s.codec_type.parse().unwrap_or(StreamKind::Other);
                StreamInfo::new(kind, s.codec_name)
            })
            .collect();

        ProbeReport {
            container_format: raw.format.format_name,
            streams,
        }
    }
}

/// Generic wrapper for a servable media item (file, url, stream)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: Uuid,
    pub filename: Option<String>,
    pub size: Option<u64>,
    /// Name of the device profile this item was analyzed against
    profile: Option<String>,
    is_analyzed: bool,
}

impl Default for MediaItem {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaItem {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: None,
            size: None,
            profile: None,
            is_analyzed: false,
        }
    }

    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Attach a device profile; marks the item as analyzed
    pub fn set_profile(&mut self, profile: impl Into<String>) {
        self.profile = Some(profile.into());
        self.is_analyzed = true;
    }

    pub fn is_analyzed(&self) -> bool {
        self.is_analyzed
    }
}
