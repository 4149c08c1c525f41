//! Desktop front end for the video-download API

// Thumbnail fetching for the info card
mod thumbnail;

use video_downloader_client::{
    config::ClientConfig,
    controller::{Controller, UiEvent},
    downloader::DiskSaver,
    history::{HistoryStore, HistoryView},
    logging,
    model::{DownloadRequest, MediaFormat, Platform, Quality},
    notify::{Notice, Toasts},
    storage::FileStorage,
    view::{InfoCard, Loader},
    ApiClient,
};

// eframe/egui for GUI application framework
use eframe::{egui, App, Frame};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for folder selection dialogs
use rfd::FileDialog;
use std::{
    collections::HashMap,
    future::Future,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};
use tokio::{
    runtime::Runtime,
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
};
use egui::{Align2, Color32, ColorImage, TextureOptions, Visuals};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// How often relative times in the history panel are recomputed
const HISTORY_REFRESH: Duration = Duration::from_secs(30);

/// Program entry point: initializes logging, config and runtime, then launches the GUI
fn main() -> Result<(), eframe::Error> {
    logging::init_tracing();

    let config = ClientConfig::load().unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid configuration, using defaults");
        ClientConfig::default()
    });
    tracing::info!(api = %config.api_base_url, "video downloader client starting");

    let rt = Arc::new(Runtime::new().expect("failed to start tokio runtime"));
    let _ = RUNTIME.set(rt);

    let app = match DownloaderApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "could not create API client");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(app)
        }),
    )
}

/// Runs a user action on the global runtime; the UI learns the outcome through events.
fn spawn<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Some(rt) = RUNTIME.get() {
        rt.spawn(fut);
    }
}

/// Application state for the GUI
struct DownloaderApp {
    /// Input field for the video URL
    url_input: String,
    /// Destination folder for downloads
    download_folder: PathBuf,
    /// Runs API calls and owns history
    controller: Controller,
    /// Events published by `controller`
    events: UnboundedReceiver<UiEvent>,
    loader: Loader,
    toasts: Toasts,
    /// Info card for the last successfully fetched URL
    card: Option<InfoCard>,
    /// Cached history display and when it was computed
    history: Option<(HistoryView, Instant)>,
    /// Cached textures keyed by thumbnail URL
    thumbnails: HashMap<String, egui::TextureHandle>,
    /// Incoming thumbnail fetch results (url, image)
    thumbnail_results: Arc<Mutex<Vec<(String, ColorImage)>>>,
    platforms: Vec<Platform>,
    /// Result of the startup health probe
    healthy: Option<bool>,
}

impl DownloaderApp {
    fn new(config: ClientConfig) -> video_downloader_client::Result<Self> {
        let download_folder = config.download_dir.clone();
        let history = HistoryStore::new(FileStorage::new(&config.storage_dir));
        let api = ApiClient::new(config)?;
        let (tx, rx) = unbounded_channel();
        let controller = Controller::new(
            api,
            history,
            Arc::new(DiskSaver::new(&download_folder)),
            tx,
        );

        // Startup probes; neither blocks the window
        {
            let c = controller.clone();
            spawn(async move {
                c.check_backend().await;
                c.load_platforms().await;
            });
        }

        Ok(Self {
            url_input: String::new(),
            download_folder,
            controller,
            events: rx,
            loader: Loader::default(),
            toasts: Toasts::default(),
            card: None,
            history: None,
            thumbnails: HashMap::new(),
            thumbnail_results: Arc::new(Mutex::new(Vec::new())),
            platforms: Vec::new(),
            healthy: None,
        })
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: UiEvent) {
        match event {
            UiEvent::Loading { visible, message } => self.loader.set(visible, message.as_deref()),
            UiEvent::Notice(notice) => self.toasts.push(notice, Instant::now()),
            UiEvent::InfoLoaded { url, info } => {
                let card = InfoCard::new(&url, &info);
                if let Some(thumb) = card.thumbnail.clone() {
                    self.request_thumbnail(ctx, thumb);
                }
                self.card = Some(card);
            }
            UiEvent::Downloaded { path, .. } => {
                tracing::debug!(path = %path.display(), "history refresh after download");
                self.history = None;
            }
            UiEvent::Platforms(list) => self.platforms = list,
            UiEvent::Health(ok) => self.healthy = Some(ok),
        }
    }

    /// Spawn thumbnail fetch in a blocking task unless already cached
    fn request_thumbnail(&self, ctx: &egui::Context, url: String) {
        if self.thumbnails.contains_key(&url) {
            return;
        }
        if let Some(rt) = RUNTIME.get() {
            let results = Arc::clone(&self.thumbnail_results);
            let ctx_c = ctx.clone();
            rt.spawn_blocking(move || {
                if let Some(img) = thumbnail::fetch_thumbnail(&url) {
                    results
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((url, img));
                    ctx_c.request_repaint();
                }
            });
        }
    }

    fn submit(&mut self) {
        // Disable the buttons now rather than when the Loading event arrives
        if !self.loader.begin("Fetching video information...") {
            return;
        }
        let c = self.controller.clone();
        let url = self.url_input.clone();
        spawn(async move {
            c.submit(&url).await;
        });
    }

    fn start_download(&mut self, request: DownloadRequest) {
        if !self.loader.begin("Preparing download...") {
            return;
        }
        let c = self.controller.clone();
        spawn(async move {
            c.download_video(request).await;
        });
    }

    fn set_download_folder(&mut self, folder: PathBuf) {
        tracing::info!(folder = %folder.display(), "download folder changed");
        self.controller = self
            .controller
            .with_saver(Arc::new(DiskSaver::new(&folder)));
        self.download_folder = folder;
    }

    fn history_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Download History");
            if ui.button("Open Folder").clicked() {
                open_folder(self.download_folder.clone());
            }
        });
        ui.separator();

        let stale = self
            .history
            .as_ref()
            .map_or(true, |(_, at)| at.elapsed() >= HISTORY_REFRESH);
        if stale {
            let view = self.controller.history_view(chrono::Local::now());
            self.history = Some((view, Instant::now()));
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| match self.history.as_ref().map(|(v, _)| v) {
                Some(HistoryView::Rows(rows)) => {
                    for row in rows {
                        ui.group(|ui| {
                            ui.strong(&row.filename);
                            ui.label(&row.detail);
                            ui.weak(&row.time);
                        });
                    }
                }
                Some(HistoryView::Empty(msg)) => {
                    ui.label(*msg);
                }
                None => {}
            });
    }

    fn info_card(&mut self, ui: &mut egui::Ui) {
        let Some(card) = self.card.as_mut() else {
            return;
        };

        let mut download = false;
        ui.group(|ui| {
            if let Some(tex) = card.thumbnail.as_ref().and_then(|t| self.thumbnails.get(t)) {
                ui.add(egui::Image::new(tex).max_width(320.0));
            }
            ui.heading(&card.title);
            ui.label(format!("Platform: {}", card.platform));
            ui.label(format!("Duration: {}", card.duration));
            ui.label(format!("Uploader: {}", card.uploader));
            if let Some(views) = &card.views {
                ui.label(format!("Views: {views}"));
            }

            ui.separator();
            ui.label("Available Qualities:");
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_source("quality-select")
                    .selected_text(card.selection.quality.label())
                    .show_ui(ui, |ui| {
                        for q in Quality::ALL {
                            ui.selectable_value(&mut card.selection.quality, q, q.label());
                        }
                    });
                egui::ComboBox::from_id_source("format-select")
                    .selected_text(card.selection.format.label())
                    .show_ui(ui, |ui| {
                        for f in MediaFormat::ALL {
                            ui.selectable_value(&mut card.selection.format, f, f.label());
                        }
                    });
            });

            download = ui
                .add_enabled(!self.loader.visible, egui::Button::new("Download"))
                .clicked();
        });

        if download {
            if let Some(request) = self.card.as_ref().map(InfoCard::request) {
                self.start_download(request);
            }
        }
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        // Single fixed-position container reused for every toast
        egui::Area::new(egui::Id::new("toast-container"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-20.0, 20.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for notice in self.toasts.visible() {
                    toast(ui, notice);
                    ui.add_space(10.0);
                }
            });
    }
}

fn toast(ui: &mut egui::Ui, notice: &Notice) {
    let [r, g, b] = notice.severity.rgb();
    egui::Frame::none()
        .fill(Color32::from_rgb(r, g, b))
        .rounding(8.0)
        .inner_margin(egui::Margin::symmetric(24.0, 16.0))
        .show(ui, |ui| {
            ui.colored_label(Color32::WHITE, &notice.message);
        });
}

/// Opens the download folder in the platform file manager
fn open_folder(folder: PathBuf) {
    std::thread::spawn(move || {
        #[cfg(target_os = "windows")]
        let cmd = "explorer";
        #[cfg(target_os = "macos")]
        let cmd = "open";
        #[cfg(all(unix, not(target_os = "macos")))]
        let cmd = "xdg-open";

        if let Err(e) = std::process::Command::new(cmd).arg(&folder).spawn() {
            tracing::warn!(folder = %folder.display(), error = %e, "could not open folder");
        }
    });
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 1️⃣ Apply everything the controller published since the last frame
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(ctx, event);
        }

        // 2️⃣ Handle completed thumbnail fetches
        {
            let mut pending = self
                .thumbnail_results
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            for (url, img) in pending.drain(..) {
                let tex = ctx.load_texture(&url, img, TextureOptions::default());
                self.thumbnails.insert(url, tex);
            }
        }

        self.toasts.expire(Instant::now());

        // 3️⃣ Right-side panel: persisted download history
        egui::SidePanel::right("history_panel").show(ctx, |ui| self.history_panel(ui));

        // 4️⃣ Bottom bar: backend status and supported platforms
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                match self.healthy {
                    Some(true) => ui.colored_label(Color32::from_rgb(0x10, 0xb9, 0x81), "● Backend online"),
                    Some(false) => ui.colored_label(Color32::from_rgb(0xef, 0x44, 0x44), "● Backend offline"),
                    None => ui.weak("● Checking backend…"),
                };
                if !self.platforms.is_empty() {
                    ui.separator();
                    let names: Vec<&str> = self
                        .platforms
                        .iter()
                        .filter(|p| p.supported)
                        .map(|p| p.name.as_str())
                        .collect();
                    ui.label(format!("Supported: {}", names.join(", ")));
                }
            });
        });

        // 5️⃣ Main panel: URL form, download folder, info card
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Video Downloader");

            ui.label("Paste video URL:");
            ui.horizontal(|ui| {
                let input = ui.text_edit_singleline(&mut self.url_input);
                let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(!self.loader.visible, egui::Button::new("Get Info"))
                    .clicked();
                if (entered || clicked) && !self.loader.visible {
                    self.submit();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Download folder:");
                ui.label(self.download_folder.display().to_string());
                if ui.button("Browse…").clicked() {
                    if let Some(folder) = FileDialog::new()
                        .set_directory(&self.download_folder)
                        .pick_folder()
                    {
                        self.set_download_folder(folder);
                    }
                }
            });

            if self.loader.visible {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(&self.loader.message);
                });
            }

            ui.add_space(8.0);
            self.info_card(ui);
        });

        self.show_toasts(ctx);

        // Request periodic repaint for incoming events and toast expiry
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
