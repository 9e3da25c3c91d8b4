use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};
use zip::read::read_zipfile_from_stream;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{ExtractError, Result};
use crate::models::{ArchiveEntry, ArchiveSource, ExtractionReport};

pub const BUFFER_SIZE: usize = 8192;

/// Processed-file counts after which the partial directory is handed out.
pub const CHECKPOINTS: [usize; 3] = [1, 10, 50];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractProgress {
    Progress { extracted: usize },
    Checkpoint { directory: PathBuf, extracted: usize },
}

pub trait ExtractObserver {
    fn on_progress(&mut self, progress: ExtractProgress);
}

impl<F> ExtractObserver for F
where
    F: FnMut(ExtractProgress),
{
    fn on_progress(&mut self, progress: ExtractProgress) {
        self(progress)
    }
}

/// Directory under `cache_root` that `source` extracts into.
///
/// Sources without a display name get a fresh random name on every call, so
/// resolve it once per run.
pub fn destination_for(source: &ArchiveSource, cache_root: &Path) -> PathBuf {
    match source.display_name() {
        Some(name) => cache_root.join(name),
        None => cache_root.join(uuid::Uuid::new_v4().to_string()),
    }
}

/// Clears whatever a previous run left at `destination` and creates it empty.
///
/// Returns `true` when the old directory could not be removed and is handed
/// back as is; nothing should be extracted into it then.
pub fn prepare_destination(destination: &Path) -> Result<bool> {
    match fs::symlink_metadata(destination) {
        Ok(meta) if meta.is_dir() => {
            if let Err(err) = fs::remove_dir_all(destination) {
                warn!("Could not clear {:?}: {}", destination, err);
            }
            if destination.is_dir() {
                return Ok(true);
            }
        }
        Ok(_) => fs::remove_file(destination).map_err(|source| ExtractError::CreateDir {
            path: destination.to_path_buf(),
            source,
        })?,
        Err(_) => {}
    }

    fs::create_dir_all(destination).map_err(|source| ExtractError::CreateDir {
        path: destination.to_path_buf(),
        source,
    })?;
    Ok(false)
}

/// Streams every file entry of `source` into its directory under `cache_root`.
///
/// Directory entries are drained but never created. `observer` sees a
/// `Progress` after each written file and a `Checkpoint` after the counts in
/// [`CHECKPOINTS`]; the returned report is the final checkpoint.
///
/// Entries whose sizes only follow the data (a data descriptor) cannot be
/// streamed; from the first such entry on the archive is read through its
/// central directory instead, continuing the same count.
pub fn extract<O>(
    source: &ArchiveSource,
    cache_root: &Path,
    cancel: &AtomicBool,
    observer: &mut O,
) -> Result<ExtractionReport>
where
    O: ExtractObserver + ?Sized,
{
    let open_err = |err| ExtractError::Open {
        path: source.path().to_path_buf(),
        source: err,
    };
    let mut reader = source.open().map_err(open_err)?;

    let destination = destination_for(source, cache_root);
    info!("Extracting {:?} into {:?}", source.path(), destination);

    check_cancel(cancel, &destination)?;
    if prepare_destination(&destination)? {
        info!("Reusing leftover directory {:?}", destination);
        return Ok(ExtractionReport {
            reused: true,
            ..ExtractionReport::empty(destination)
        });
    }

    let mut report = ExtractionReport::empty(destination.clone());
    match stream_entries(&mut reader, &destination, cancel, observer, &mut report) {
        Err(ExtractError::Archive(ZipError::UnsupportedArchive(detail))) => {
            let consumed = report.files_extracted + report.directories_skipped;
            warn!(
                "Cannot stream {:?} past entry {} ({}), reading its central directory",
                source.path(),
                consumed,
                detail
            );
            let mut archive = ZipArchive::new(source.open().map_err(open_err)?)?;
            indexed_entries(&mut archive, consumed, &destination, cancel, observer, &mut report)?;
        }
        result => result?,
    }

    info!(
        "Extracted {} files ({} bytes) into {:?}",
        report.files_extracted, report.bytes_written, report.directory
    );
    Ok(report)
}

/// Extraction loop over an already opened ZIP stream into an existing
/// `destination`.
pub fn extract_from_reader<R, O>(
    reader: &mut R,
    destination: &Path,
    cancel: &AtomicBool,
    observer: &mut O,
) -> Result<ExtractionReport>
where
    R: Read,
    O: ExtractObserver + ?Sized,
{
    let mut report = ExtractionReport::empty(destination.to_path_buf());
    stream_entries(reader, destination, cancel, observer, &mut report)?;
    Ok(report)
}

fn stream_entries<R, O>(
    reader: &mut R,
    destination: &Path,
    cancel: &AtomicBool,
    observer: &mut O,
    report: &mut ExtractionReport,
) -> Result<()>
where
    R: Read,
    O: ExtractObserver + ?Sized,
{
    let mut buffer = [0u8; BUFFER_SIZE];
    loop {
        check_cancel(cancel, destination)?;

        let mut file = match read_zipfile_from_stream(reader)? {
            Some(file) => file,
            None => return Ok(()),
        };
        let entry = ArchiveEntry {
            name: file.name().to_string(),
            is_directory: file.is_dir(),
            size: file.size(),
        };
        // Dropping a skipped directory entry drains it from the stream.
        write_entry(&mut file, entry, destination, &mut buffer, observer, report)?;
    }
}

/// Entries `skip..` of a seekable archive, in central directory order.
fn indexed_entries<R, O>(
    archive: &mut ZipArchive<R>,
    skip: usize,
    destination: &Path,
    cancel: &AtomicBool,
    observer: &mut O,
    report: &mut ExtractionReport,
) -> Result<()>
where
    R: Read + Seek,
    O: ExtractObserver + ?Sized,
{
    let mut buffer = [0u8; BUFFER_SIZE];
    for index in skip..archive.len() {
        check_cancel(cancel, destination)?;

        let mut file = archive.by_index(index)?;
        let entry = ArchiveEntry {
            name: file.name().to_string(),
            is_directory: file.is_dir(),
            size: file.size(),
        };
        write_entry(&mut file, entry, destination, &mut buffer, observer, report)?;
    }
    Ok(())
}

fn check_cancel(cancel: &AtomicBool, destination: &Path) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        info!("Extraction into {:?} cancelled", destination);
        return Err(ExtractError::Cancelled);
    }
    Ok(())
}

fn write_entry<R, O>(
    file: &mut R,
    entry: ArchiveEntry,
    destination: &Path,
    buffer: &mut [u8],
    observer: &mut O,
    report: &mut ExtractionReport,
) -> Result<()>
where
    R: Read,
    O: ExtractObserver + ?Sized,
{
    if entry.is_directory {
        debug!("Skipping directory entry {}", entry.name);
        report.directories_skipped += 1;
        return Ok(());
    }

    let target = destination.join(&entry.name);
    let written = copy_entry(file, &target, buffer)?;
    debug!("Wrote {} ({} of {} bytes)", entry.name, written, entry.size);

    report.files_extracted += 1;
    report.bytes_written += written;

    let extracted = report.files_extracted;
    observer.on_progress(ExtractProgress::Progress { extracted });
    if CHECKPOINTS.contains(&extracted) {
        observer.on_progress(ExtractProgress::Checkpoint {
            directory: destination.to_path_buf(),
            extracted,
        });
    }
    Ok(())
}

fn copy_entry<R: Read>(entry: &mut R, target: &Path, buffer: &mut [u8]) -> Result<u64> {
    let write_err = |source| ExtractError::Write {
        path: target.to_path_buf(),
        source,
    };

    let mut out = File::create(target).map_err(write_err)?;
    let mut written = 0u64;
    loop {
        let n = entry.read(buffer).map_err(ZipError::from)?;
        if n == 0 {
            break;
        }
        out.write_all(&buffer[..n]).map_err(write_err)?;
        written += n as u64;
    }
    out.flush().map_err(write_err)?;
    Ok(written)
}
