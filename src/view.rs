//! Window-independent display models: the loading indicator, the video info
//! card and its quality/format selector.

use crate::format::{format_duration, format_number};
use crate::model::{DownloadRequest, MediaFormat, Quality, VideoFormat, VideoInfo};

pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

/// Loading indicator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    pub visible: bool,
    pub message: String,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            visible: false,
            message: DEFAULT_LOADING_MESSAGE.to_string(),
        }
    }
}

impl Loader {
    /// Shows or hides the indicator. The text is only replaced when a message is given.
    pub fn set(&mut self, visible: bool, message: Option<&str>) {
        self.visible = visible;
        if let Some(m) = message {
            self.message = m.to_string();
        }
    }

    /// Shows the indicator for a new action; false if one is already running.
    pub fn begin(&mut self, message: &str) -> bool {
        if self.visible {
            return false;
        }
        self.set(true, Some(message));
        true
    }
}

/// User's choice in the info card selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSelection {
    pub quality: Quality,
    pub format: MediaFormat,
}

impl Default for DownloadSelection {
    fn default() -> Self {
        Self {
            quality: Quality::P720,
            format: MediaFormat::Mp4,
        }
    }
}

impl DownloadSelection {
    /// Picking mp3 means audio only; the wire format then stays at mp4.
    pub fn to_request(self, url: &str) -> DownloadRequest {
        let (format, audio_only) = match self.format {
            MediaFormat::Mp4 => (VideoFormat::Mp4, false),
            MediaFormat::Webm => (VideoFormat::Webm, false),
            MediaFormat::Mp3 => (VideoFormat::Mp4, true),
        };
        DownloadRequest {
            url: url.to_string(),
            quality: self.quality,
            format,
            audio_only,
        }
    }
}

/// Rendered metadata card for a fetched video
#[derive(Debug, Clone, PartialEq)]
pub struct InfoCard {
    pub source_url: String,
    pub title: String,
    pub platform: String,
    pub duration: String,
    pub uploader: String,
    pub views: Option<String>,
    pub thumbnail: Option<String>,
    pub selection: DownloadSelection,
}

impl InfoCard {
    pub fn new(source_url: &str, info: &VideoInfo) -> Self {
        let or_unknown = |v: &Option<String>, fallback: &str| {
            v.as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            source_url: source_url.to_string(),
            title: or_unknown(&info.title, "Unknown Title"),
            platform: or_unknown(&info.platform, "Unknown"),
            duration: format_duration(info.duration_secs()),
            uploader: or_unknown(&info.uploader, "Unknown"),
            views: info.view_count.filter(|v| *v > 0).map(format_number),
            thumbnail: info.thumbnail_url().map(str::to_string),
            selection: DownloadSelection::default(),
        }
    }

    pub fn request(&self) -> DownloadRequest {
        self.selection.to_request(&self.source_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_fills_unknowns() {
        let card = InfoCard::new("https://youtu.be/a", &VideoInfo {
            success: true,
            view_count: Some(0),
            ..Default::default()
        });
        assert_eq!(card.title, "Unknown Title");
        assert_eq!(card.platform, "Unknown");
        assert_eq!(card.uploader, "Unknown");
        assert_eq!(card.duration, "0:00");
        assert_eq!(card.views, None);
        assert_eq!(card.thumbnail, None);
        assert_eq!(card.selection.quality, Quality::P720);
        assert_eq!(card.selection.format, MediaFormat::Mp4);
    }

    #[test]
    fn card_formats_values() {
        let card = InfoCard::new("https://youtu.be/a", &VideoInfo {
            success: true,
            title: Some("Talk".into()),
            duration: Some(3661.0),
            view_count: Some(1234567),
            thumbnail: Some("https://i.ytimg.com/t.jpg".into()),
            ..Default::default()
        });
        assert_eq!(card.duration, "1:01:01");
        assert_eq!(card.views.as_deref(), Some("1,234,567"));
        assert_eq!(card.thumbnail.as_deref(), Some("https://i.ytimg.com/t.jpg"));
    }

    #[test]
    fn mp3_selection_becomes_audio_only() {
        let sel = DownloadSelection {
            quality: Quality::Best,
            format: MediaFormat::Mp3,
        };
        let req = sel.to_request("https://youtu.be/a");
        assert!(req.audio_only);
        assert_eq!(req.format, VideoFormat::Mp4);
        assert_eq!(req.saved_format(), MediaFormat::Mp3);

        let req = DownloadSelection { format: MediaFormat::Webm, ..sel }.to_request("u");
        assert!(!req.audio_only);
        assert_eq!(req.format, VideoFormat::Webm);
    }

    #[test]
    fn loader_refuses_second_action_until_hidden() {
        let mut l = Loader::default();
        assert!(l.begin("Fetching video information..."));
        assert!(!l.begin("Preparing download..."));
        assert_eq!(l.message, "Fetching video information...");

        l.set(false, None);
        assert!(l.begin("Preparing download..."));
    }

    #[test]
    fn loader_keeps_message_when_hidden() {
        let mut l = Loader::default();
        l.set(true, Some("Preparing download..."));
        l.set(false, None);
        assert!(!l.visible);
        assert_eq!(l.message, "Preparing download...");
    }
}
