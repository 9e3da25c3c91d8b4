use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::models::{ArchiveSource, DisplayItem};
use crate::worker::ExtractionEvent;

pub const STATUS_STARTED: &str = "Extracting archive...";

/// Immediate children of `directory`, in listing order, as page images.
pub fn list_pages(directory: &Path) -> Vec<DisplayItem> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {:?}: {}", directory, e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| DisplayItem::Image(entry.path()))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenState {
    Idle,
    Extracting,
    Presented,
    Failed { message: String, retryable: bool },
}

/// Whole-screen state: what is listed, what the status line says and whether
/// the "pick a comic" affordance is still offered.
pub struct Presenter {
    state: ScreenState,
    status: String,
    items: Vec<DisplayItem>,
    source: Option<ArchiveSource>,
    renders: usize,
}

impl Default for Presenter {
    fn default() -> Self {
        Self {
            state: ScreenState::Idle,
            status: String::new(),
            items: Vec::new(),
            source: None,
            renders: 0,
        }
    }
}

impl Presenter {
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Number of list refreshes so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn shows_picker(&self) -> bool {
        self.state != ScreenState::Presented
    }

    /// Source to restart with, if the last run failed in a retryable way.
    pub fn retry_source(&self) -> Option<&ArchiveSource> {
        match self.state {
            ScreenState::Failed { retryable: true, .. } => self.source.as_ref(),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: ExtractionEvent) {
        match event {
            ExtractionEvent::Started { source } => {
                self.source = Some(source);
                self.items.clear();
                self.state = ScreenState::Extracting;
                self.status = STATUS_STARTED.to_string();
            }
            ExtractionEvent::Progress { extracted } => {
                self.status = format!("Extracted {extracted} pages");
            }
            ExtractionEvent::Checkpoint { directory, .. } => {
                self.present(&directory, false);
            }
            ExtractionEvent::Finished(Ok(report)) => {
                self.present(&report.directory, true);
            }
            ExtractionEvent::Finished(Err(err)) => self.fail(&err),
        }
    }

    /// Replaces the list with the current contents of `directory`.
    pub fn present(&mut self, directory: &Path, is_final: bool) -> &[DisplayItem] {
        self.items = list_pages(directory);
        self.renders += 1;
        if is_final {
            self.state = ScreenState::Presented;
        }
        debug!(
            "Rendered {} pages from {:?} (final: {})",
            self.items.len(),
            directory,
            is_final
        );
        &self.items
    }

    fn fail(&mut self, err: &ExtractError) {
        self.status = err.to_string();
        self.state = ScreenState::Failed {
            message: err.to_string(),
            retryable: err.is_retryable(),
        };
    }
}
