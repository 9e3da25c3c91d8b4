use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::chrome::ChromeState;
use crate::cli::ReaderSettings;
use crate::models::{ArchiveSource, ExtractionReport};
use crate::presenter::{Presenter, ScreenState};
use crate::ui::{draw_failure, draw_pages, draw_status, draw_summary};
use crate::worker::{ExtractionEvent, ExtractionTask};

pub const ARCHIVE_EXTENSIONS: [&str; 3] = ["cbr", "cbz", "zip"];

pub struct ComicReader {
    pub settings: ReaderSettings,
    pub presenter: Presenter,
    pub task: Option<ExtractionTask>,
    pub chrome: ChromeState,
    pub last_report: Option<ExtractionReport>,
}

impl ComicReader {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: ReaderSettings,
        initial: Option<PathBuf>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut reader = Self::with_settings(settings);
        if let Some(path) = initial {
            reader.open_archive(ArchiveSource::from_path(path));
        }
        reader
    }

    pub fn with_settings(settings: ReaderSettings) -> Self {
        Self {
            settings,
            presenter: Presenter::default(),
            task: None,
            chrome: ChromeState::default(),
            last_report: None,
        }
    }

    pub fn is_extracting(&self) -> bool {
        self.task.is_some()
    }

    pub fn pick_archive(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Comic book", &ARCHIVE_EXTENSIONS)
            .pick_file()
        {
            self.open_archive(ArchiveSource::from_path(path));
        }
    }

    /// Starts extracting `source`, replacing any run still in flight.
    pub fn open_archive(&mut self, source: ArchiveSource) {
        if let Some(previous) = self.task.take() {
            previous.cancel();
            previous.join();
        }

        info!("Opening {:?}", source.path());
        self.last_report = None;
        match ExtractionTask::spawn(source, self.settings.cache_root.clone()) {
            Ok(task) => self.task = Some(task),
            Err(e) => error!("Could not start extraction thread: {}", e),
        }
    }

    pub fn cancel_extraction(&mut self) {
        if let Some(task) = &self.task {
            task.cancel();
        }
    }

    /// Feeds queued worker events to the presenter. Returns how many were
    /// handled.
    pub fn poll_events(&mut self) -> usize {
        let events = match &self.task {
            Some(task) => task.drain(),
            None => return 0,
        };

        let count = events.len();
        let mut finished = false;
        for event in events {
            if let ExtractionEvent::Finished(result) = &event {
                finished = true;
                if let Ok(report) = result {
                    self.last_report = Some(report.clone());
                }
            }
            self.presenter.handle(event);
        }

        if finished {
            if let Some(task) = self.task.take() {
                task.join();
            }
        }
        count
    }

    pub fn handle_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        if !self.presenter.shows_picker() {
            info!("Ignoring {} dropped files, a comic is already shown", dropped.len());
            return;
        }

        // Only one comic can be shown, the first usable drop wins.
        match dropped.iter().find_map(|file| file.path.clone()) {
            Some(path) => self.open_archive(ArchiveSource::from_path(path)),
            None => warn!("Dropped file has no path"),
        }
    }
}

impl eframe::App for ComicReader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let focused = ctx.input(|i| i.focused);
        if self.chrome.on_frame(focused) {
            self.settings.chrome.apply(ctx);
        }

        self.handle_drops(ctx);
        self.poll_events();

        let mut pick = false;
        let mut cancel = false;
        let mut retry = false;

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            draw_status(
                ui,
                self.presenter.status(),
                self.presenter.shows_picker(),
                self.task.is_some(),
                &mut || pick = true,
                &mut || cancel = true,
            );
            if let ScreenState::Failed { message, retryable } = self.presenter.state() {
                draw_failure(ui, message, *retryable, &mut || retry = true);
            }
            if let Some(report) = &self.last_report {
                draw_summary(ui, report);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            draw_pages(ui, self.presenter.items());
        });

        if pick {
            self.pick_archive();
        }
        if cancel {
            self.cancel_extraction();
        }
        if retry {
            if let Some(source) = self.presenter.retry_source().cloned() {
                self.open_archive(source);
            }
        }

        if self.task.is_some() {
            ctx.request_repaint();
        }
    }
}
