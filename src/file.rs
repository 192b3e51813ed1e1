use std::path::{Path, PathBuf};

/// A non-directory entry of the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceFile {
    /// Full path to the file
    pub(crate) path: PathBuf,

    /// File name as shown in reports
    pub(crate) name: String,
}

impl SourceFile {
    /// Creates a source file from its path.
    #[must_use]
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { path, name }
    }

    /// File name without its final extension.
    ///
    /// Dotfiles such as `.hidden` keep their whole name as the stem.
    #[must_use]
    pub(crate) fn stem(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| self.name.clone(), |s| s.to_string_lossy().into_owned())
    }

    /// Final extension without the dot, if any.
    #[must_use]
    pub(crate) fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }
}

/// Returns true if `path` resolves to a directory, following symlinks.
#[must_use]
pub(crate) fn is_directory(path: &Path) -> bool {
    path.is_dir()
}
