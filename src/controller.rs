//! Glue between the API client and the window.
//!
//! Each public operation runs one user action to completion. Errors never
//! escape: they become a [`Notice`] on the event channel plus a safe fallback
//! return value.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, Utc};
use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiClient;
use crate::downloader::FileSaver;
use crate::error::{ClientError, Result};
use crate::history::{HistoryStore, HistoryView, EMPTY_HISTORY_MESSAGE};
use crate::model::{DownloadRequest, HistoryEntry, Platform, VideoInfo};
use crate::notify::Notice;
use crate::validation::{check_input, validate_url};

/// Updates published to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Show/hide the loading indicator; `None` keeps the current text
    Loading { visible: bool, message: Option<String> },
    Notice(Notice),
    /// Metadata fetched for `url`, ready to display
    InfoLoaded { url: String, info: VideoInfo },
    /// A file was saved and history was rewritten
    Downloaded { entry: HistoryEntry, path: PathBuf },
    Platforms(Vec<Platform>),
    Health(bool),
}

#[derive(Clone)]
pub struct Controller {
    api: ApiClient,
    history: Arc<Mutex<HistoryStore>>,
    saver: Arc<dyn FileSaver>,
    events: UnboundedSender<UiEvent>,
}

impl Controller {
    pub fn new(
        api: ApiClient,
        history: HistoryStore,
        saver: Arc<dyn FileSaver>,
        events: UnboundedSender<UiEvent>,
    ) -> Self {
        Self {
            api,
            history: Arc::new(Mutex::new(history)),
            saver,
            events,
        }
    }

    /// Same controller and history, saving into a different place.
    pub fn with_saver(&self, saver: Arc<dyn FileSaver>) -> Self {
        Self {
            saver,
            ..self.clone()
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn emit(&self, event: UiEvent) {
        let _ = self.events.send(event);
    }

    fn loading(&self, visible: bool, message: Option<&str>) {
        self.emit(UiEvent::Loading {
            visible,
            message: message.map(str::to_string),
        });
    }

    fn notify(&self, notice: Notice) {
        self.emit(UiEvent::Notice(notice));
    }

    fn history(&self) -> MutexGuard<'_, HistoryStore> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Health probe run when the window opens.
    pub async fn check_backend(&self) -> bool {
        let healthy = self.api.check_health().await;
        if !healthy {
            self.notify(Notice::error(
                "Backend is not responding. Please check your API URL.",
            ));
        }
        self.emit(UiEvent::Health(healthy));
        healthy
    }

    /// Best-effort platform list; failures leave it empty.
    pub async fn load_platforms(&self) -> Vec<Platform> {
        let platforms = self.api.supported_platforms().await;
        self.emit(UiEvent::Platforms(platforms.clone()));
        platforms
    }

    /// Form submission: validates the raw input, then fetches and publishes metadata.
    pub async fn submit(&self, raw_url: &str) -> Option<VideoInfo> {
        let url = match check_input(raw_url) {
            Ok(url) => url,
            Err(e) => {
                self.loading(false, None);
                self.notify(e.into());
                return None;
            }
        };

        let info = self.get_video_info(&url).await;
        if !info.success {
            return None;
        }
        self.emit(UiEvent::InfoLoaded {
            url,
            info: info.clone(),
        });
        Some(info)
    }

    /// Metadata for `url`, or `VideoInfo { success: false, error }` on any failure.
    pub async fn get_video_info(&self, url: &str) -> VideoInfo {
        if !validate_url(url) {
            self.loading(false, None);
            self.notify(Notice::error("Please enter a valid URL"));
            return VideoInfo::failed("Please enter a valid URL");
        }

        self.loading(true, Some("Fetching video information..."));
        let result = self.api.video_info(url).await;
        self.loading(false, None);

        match result {
            Ok(info) => info,
            Err(e) => {
                let message = e.user_message();
                tracing::error!(%url, error = %message, "error fetching video info");
                self.notify(Notice::error(format!("Error: {message}")));
                VideoInfo::failed(message)
            }
        }
    }

    /// Downloads, saves and records one file. Failures surface only as notices.
    pub async fn download_video(&self, request: DownloadRequest) -> Option<HistoryEntry> {
        if !validate_url(&request.url) {
            self.loading(false, None);
            self.notify(Notice::error("Please enter a valid URL"));
            return None;
        }

        self.loading(true, Some("Preparing download..."));
        let result = self.run_download(&request).await;
        self.loading(false, None);

        match result {
            Ok((entry, path)) => {
                self.notify(Notice::success("Download started successfully!"));
                self.emit(UiEvent::Downloaded {
                    entry: entry.clone(),
                    path,
                });
                Some(entry)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::error!(url = %request.url, error = %message, "download error");
                self.notify(Notice::error(format!("Download failed: {message}")));
                None
            }
        }
    }

    async fn run_download(&self, request: &DownloadRequest) -> Result<(HistoryEntry, PathBuf)> {
        tracing::info!(
            url = %request.url,
            quality = %request.quality,
            format = request.format.as_str(),
            audio_only = request.audio_only,
            "starting download"
        );
        let file = self.api.download(request).await?;
        let path = self.saver.save(&file.filename, &file.bytes).await?;

        let entry = HistoryEntry {
            url: request.url.clone(),
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(file.filename),
            quality: request.quality,
            format: request.saved_format(),
            timestamp: Utc::now().timestamp_millis(),
        };
        self.history().record(entry.clone())?;
        Ok((entry, path))
    }

    /// Current history rendered relative to `now`.
    pub fn history_view(&self, now: DateTime<Local>) -> HistoryView {
        match self.history().render(now) {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(error = %e, "could not read download history");
                HistoryView::Empty(EMPTY_HISTORY_MESSAGE)
            }
        }
    }

    pub fn history_entries(&self) -> Result<Vec<HistoryEntry>> {
        self.history().entries()
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("api", &self.api.config().api_base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl From<ClientError> for Notice {
    fn from(e: ClientError) -> Self {
        Notice::error(e.user_message())
    }
}
