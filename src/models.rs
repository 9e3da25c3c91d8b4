use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// A comic archive the user picked, plus the name it is shown under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveSource {
    path: PathBuf,
    display_name: Option<String>,
}

impl ArchiveSource {
    pub fn new(path: impl Into<PathBuf>, display_name: Option<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.filter(|name| !name.is_empty()),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Self::new(path, display_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn open(&self) -> io::Result<BufReader<File>> {
        Ok(BufReader::new(File::open(&self.path)?))
    }
}

#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
}

/// One row of the page list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DisplayItem {
    Image(PathBuf),
}

impl DisplayItem {
    pub fn path(&self) -> &Path {
        match self {
            DisplayItem::Image(path) => path,
        }
    }

    /// URI understood by the egui image loaders.
    pub fn uri(&self) -> String {
        format!("file://{}", self.path().display())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionReport {
    pub directory: PathBuf,
    pub files_extracted: usize,
    pub directories_skipped: usize,
    pub bytes_written: u64,
    /// Set when a leftover directory was handed back without extracting.
    pub reused: bool,
}

impl ExtractionReport {
    pub(crate) fn empty(directory: PathBuf) -> Self {
        Self {
            directory,
            files_extracted: 0,
            directories_skipped: 0,
            bytes_written: 0,
            reused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_comes_from_file_name() {
        let source = ArchiveSource::from_path("/comics/sample.cbr");
        assert_eq!(source.display_name(), Some("sample.cbr"));
        assert_eq!(source.path(), Path::new("/comics/sample.cbr"));
    }

    #[test]
    fn empty_display_name_counts_as_missing() {
        let source = ArchiveSource::new("/comics/sample.cbr", Some(String::new()));
        assert_eq!(source.display_name(), None);
    }

    #[test]
    fn image_uri_uses_file_scheme() {
        let item = DisplayItem::Image(PathBuf::from("/tmp/sample.cbr/01.jpg"));
        assert_eq!(item.uri(), "file:///tmp/sample.cbr/01.jpg");
    }
}
