//! Desktop comic book reader: streams a CBR/CBZ archive into a cache
//! directory on a worker thread and shows the pages as they land.

pub mod app;
pub mod chrome;
pub mod cli;
pub mod error;
pub mod extract;
pub mod models;
pub mod presenter;
pub mod ui;
pub mod utils;
pub mod worker;

pub use app::ComicReader;
pub use cli::{Cli, ReaderSettings};
pub use error::{ExtractError, Result};
pub use extract::{extract, extract_from_reader, ExtractObserver, ExtractProgress, CHECKPOINTS};
pub use models::{ArchiveEntry, ArchiveSource, DisplayItem, ExtractionReport};
pub use presenter::{list_pages, Presenter, ScreenState};
pub use worker::{ExtractionEvent, ExtractionTask};
