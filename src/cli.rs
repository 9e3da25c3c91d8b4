use std::path::PathBuf;

use clap::Parser;

use crate::chrome::ChromeVisibility;
use crate::utils::get_cache_root;

#[derive(Parser, Debug)]
#[command(name = "comic-reader")]
#[command(version)]
#[command(about = "Extracts a CBR/CBZ archive and shows its pages", long_about = None)]
pub struct Cli {
    /// Archive to open on startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Where extracted pages are kept (default: <tmp>/comic_reader)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep window decorations instead of going fullscreen
    #[arg(long)]
    pub windowed: bool,
}

#[derive(Clone, Debug)]
pub struct ReaderSettings {
    pub cache_root: PathBuf,
    pub chrome: ChromeVisibility,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            cache_root: get_cache_root(),
            chrome: ChromeVisibility::default(),
        }
    }
}

impl Cli {
    pub fn settings(&self) -> ReaderSettings {
        ReaderSettings {
            cache_root: self.cache_dir.clone().unwrap_or_else(get_cache_root),
            chrome: if self.windowed {
                ChromeVisibility::windowed()
            } else {
                ChromeVisibility::default()
            },
        }
    }
}
