use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::extract::{extract, ExtractProgress};
use crate::models::{ArchiveSource, ExtractionReport};

/// Everything the foreground loop hears from a running extraction.
#[derive(Debug)]
pub enum ExtractionEvent {
    Started { source: ArchiveSource },
    Progress { extracted: usize },
    Checkpoint { directory: PathBuf, extracted: usize },
    Finished(Result<ExtractionReport>),
}

impl From<ExtractProgress> for ExtractionEvent {
    fn from(progress: ExtractProgress) -> Self {
        match progress {
            ExtractProgress::Progress { extracted } => ExtractionEvent::Progress { extracted },
            ExtractProgress::Checkpoint {
                directory,
                extracted,
            } => ExtractionEvent::Checkpoint {
                directory,
                extracted,
            },
        }
    }
}

/// One extraction running on its own thread.
pub struct ExtractionTask {
    source: ArchiveSource,
    events: Receiver<ExtractionEvent>,
    cancel: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ExtractionTask {
    pub fn spawn(source: ArchiveSource, cache_root: PathBuf) -> std::io::Result<Self> {
        let (tx, rx) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker_source = source.clone();
        let worker_cancel = Arc::clone(&cancel);
        let handle = thread::Builder::new()
            .name("extract".into())
            .spawn(move || run(worker_source, cache_root, worker_cancel, tx))?;

        Ok(Self {
            source,
            events: rx,
            cancel,
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn cancel(&self) {
        info!("Cancelling extraction of {:?}", self.source.path());
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Everything queued so far, without blocking.
    pub fn drain(&self) -> Vec<ExtractionEvent> {
        self.events.try_iter().collect()
    }

    /// Blocks until the worker has sent its last event.
    pub fn recv(&self) -> Option<ExtractionEvent> {
        self.events.recv().ok()
    }

    /// Waits for the worker thread to exit.
    pub fn join(&self) {
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                error!("Extraction thread for {:?} panicked", self.source.path());
            }
        }
    }
}

impl Drop for ExtractionTask {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

fn run(
    source: ArchiveSource,
    cache_root: PathBuf,
    cancel: Arc<AtomicBool>,
    tx: Sender<ExtractionEvent>,
) {
    // A closed receiver just means nobody is watching any more.
    let send = |event: ExtractionEvent| {
        let _ = tx.send(event);
    };

    send(ExtractionEvent::Started {
        source: source.clone(),
    });
    let result = extract(&source, &cache_root, &cancel, &mut |progress: ExtractProgress| {
        send(progress.into())
    });
    if let Err(err) = &result {
        warn!("Extraction of {:?} failed: {}", source.path(), err);
    }
    send(ExtractionEvent::Finished(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn missing_source_finishes_with_open_error() {
        let cache = tempfile::tempdir().unwrap();
        let task = ExtractionTask::spawn(
            ArchiveSource::from_path(cache.path().join("missing.cbr")),
            cache.path().to_path_buf(),
        )
        .unwrap();

        assert!(matches!(task.recv(), Some(ExtractionEvent::Started { .. })));
        assert!(matches!(
            task.recv(),
            Some(ExtractionEvent::Finished(Err(ExtractError::Open { .. })))
        ));
        assert!(task.recv().is_none());
        task.join();
    }

    #[test]
    fn cancelled_worker_finishes_without_touching_output() {
        let input = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let archive = input.path().join("sample.cbr");
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("01.jpg", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"page").unwrap();
        std::fs::write(&archive, writer.finish().unwrap().into_inner()).unwrap();

        let (tx, rx) = unbounded();
        run(
            ArchiveSource::from_path(&archive),
            cache.path().to_path_buf(),
            Arc::new(AtomicBool::new(true)),
            tx,
        );

        let events: Vec<ExtractionEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ExtractionEvent::Started { .. }));
        assert!(matches!(
            events[1],
            ExtractionEvent::Finished(Err(ExtractError::Cancelled))
        ));
        assert!(!cache.path().join("sample.cbr").exists());
    }
}
