use crate::{
    config::Config,
    error::{Error, Result},
    file::{is_directory, SourceFile},
};
use std::path::PathBuf;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// One candidate produced by a scan.
#[derive(Debug, Clone)]
pub(crate) enum ScanEntry {
    /// A non-directory entry to convert
    File(SourceFile),

    /// An entry the listing could not read
    Unreadable {
        /// Name of the entry, as far as it is known
        name: String,
        /// Why it could not be read
        error: Error,
    },
}

/// Lists the immediate entries of the source directory.
pub(crate) struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
        }
    }

    /// Returns every non-directory entry, sorted by file name.
    ///
    /// Directories are left out entirely. Entries that fail to list are
    /// returned as [`ScanEntry::Unreadable`] so they can be reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory itself cannot be read.
    pub(crate) fn scan(&self) -> Result<Vec<ScanEntry>> {
        debug!("Listing {}", self.source_dir.display());

        let walker = WalkDir::new(&self.source_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut entries = Vec::new();
        let mut directories = 0usize;

        for result in walker {
            match result {
                Ok(entry) => {
                    if is_directory(entry.path()) {
                        trace!("Skipping directory: {}", entry.path().display());
                        directories += 1;
                        continue;
                    }
                    entries.push(ScanEntry::File(SourceFile::new(entry.into_path())));
                }
                Err(e) if e.depth() == 0 => {
                    let path = e.path().map_or_else(|| self.source_dir.clone(), PathBuf::from);
                    let io = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Err(Error::io(path, io));
                }
                Err(e) => {
                    let path = e.path().map(PathBuf::from);
                    let name = path
                        .as_deref()
                        .and_then(|p| p.file_name())
                        .map_or_else(
                            || "<unknown>".to_string(),
                            |n| n.to_string_lossy().into_owned(),
                        );
                    warn!("Cannot read directory entry {}: {}", name, e);
                    let error = Error::Io {
                        path: path.unwrap_or_else(|| self.source_dir.clone()),
                        message: e.to_string(),
                    };
                    entries.push(ScanEntry::Unreadable { name, error });
                }
            }
        }

        debug!(
            "Scan complete: {} candidate files, {} directories ignored",
            entries.len(),
            directories
        );

        Ok(entries)
    }
}
