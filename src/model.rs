//! Data shapes exchanged with the backend and persisted in history.

use serde::{Deserialize, Serialize};

/// Requested video quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "4k")]
    UltraHd,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
    #[default]
    #[serde(rename = "best")]
    Best,
}

impl Quality {
    /// Selector order, best first
    pub const ALL: [Quality; 6] = [
        Quality::Best,
        Quality::UltraHd,
        Quality::P1080,
        Quality::P720,
        Quality::P480,
        Quality::P360,
    ];

    /// Wire value sent to the backend
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::UltraHd => "4k",
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::P360 => "360p",
            Quality::Best => "best",
        }
    }

    /// Human-readable selector label
    pub fn label(self) -> &'static str {
        match self {
            Quality::UltraHd => "4K (2160p)",
            Quality::P1080 => "1080p (Full HD)",
            Quality::P720 => "720p (HD)",
            Quality::P480 => "480p (SD)",
            Quality::P360 => "360p",
            Quality::Best => "Best Quality",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container format the backend can merge video into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Mp4,
    Webm,
}

impl VideoFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Webm => "webm",
        }
    }
}

/// Format of a file as it ends up on disk; `Mp3` means audio only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    #[default]
    Mp4,
    Webm,
    Mp3,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 3] = [MediaFormat::Mp4, MediaFormat::Webm, MediaFormat::Mp3];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Webm => "webm",
            MediaFormat::Mp3 => "mp3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "MP4 (Video)",
            MediaFormat::Webm => "WebM (Video)",
            MediaFormat::Mp3 => "MP3 (Audio Only)",
        }
    }
}

impl From<VideoFormat> for MediaFormat {
    fn from(f: VideoFormat) -> Self {
        match f {
            VideoFormat::Mp4 => MediaFormat::Mp4,
            VideoFormat::Webm => MediaFormat::Webm,
        }
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable format as reported by the info endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatInfo {
    pub format_id: Option<String>,
    pub quality: Option<String>,
    pub ext: Option<String>,
    pub filesize: Option<u64>,
    pub resolution: Option<String>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

/// Metadata for a video, or a tagged failure when `success` is false
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoInfo {
    /// Whether the backend (and the transport) succeeded
    pub success: bool,
    /// Failure message when `success` is false
    pub error: Option<String>,
    /// Video title
    pub title: Option<String>,
    /// Platform id detected by the backend (e.g. "youtube")
    pub platform: Option<String>,
    /// Length in seconds; may arrive fractional
    pub duration: Option<f64>,
    /// Channel or account name
    pub uploader: Option<String>,
    /// Total views
    pub view_count: Option<u64>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Truncated description
    pub description: Option<String>,
    /// Upload date as YYYYMMDD
    pub upload_date: Option<String>,
    /// Video formats, largest first
    pub formats: Option<Vec<FormatInfo>>,
    /// The URL the info was requested for
    pub url: Option<String>,
}

impl VideoInfo {
    /// Failure value returned instead of an error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Duration as whole non-negative seconds.
    pub fn duration_secs(&self) -> u64 {
        match self.duration {
            Some(d) if d.is_finite() && d > 0.0 => d.floor() as u64,
            _ => 0,
        }
    }

    /// Thumbnail URL, ignoring the empty string the backend sends when none exists.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Body of `POST /api/download`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: Quality,
    pub format: VideoFormat,
    pub audio_only: bool,
}

impl DownloadRequest {
    /// Request with the backend defaults: best quality, mp4, video.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quality: Quality::default(),
            format: VideoFormat::default(),
            audio_only: false,
        }
    }

    /// Format of the file the backend will send back.
    pub fn saved_format(&self) -> MediaFormat {
        if self.audio_only {
            MediaFormat::Mp3
        } else {
            self.format.into()
        }
    }

    /// Filename used when the response has no Content-Disposition.
    pub fn fallback_filename(&self) -> String {
        format!("video.{}", self.saved_format())
    }
}

/// One persisted record of a completed download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Source video URL
    pub url: String,
    /// Name the file was saved under
    pub filename: String,
    /// Requested quality
    pub quality: Quality,
    /// Actual saved type (`mp3` for audio-only downloads)
    pub format: MediaFormat,
    /// Completion time in epoch milliseconds
    pub timestamp: i64,
}

/// A platform the backend supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlatformRepr")]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub supported: bool,
    pub features: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlatformRepr {
    Name(String),
    Full {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default = "default_supported")]
        supported: bool,
        #[serde(default)]
        features: Vec<String>,
    },
}

fn default_supported() -> bool {
    true
}

impl From<PlatformRepr> for Platform {
    fn from(repr: PlatformRepr) -> Self {
        match repr {
            PlatformRepr::Name(name) => Platform {
                id: name.to_lowercase(),
                name,
                supported: true,
                features: Vec::new(),
            },
            PlatformRepr::Full {
                id,
                name,
                supported,
                features,
            } => Platform {
                id: if id.is_empty() { name.to_lowercase() } else { id },
                name,
                supported,
                features,
            },
        }
    }
}
