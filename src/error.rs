use image::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the jpegify library.
///
/// [`Error::InvalidSource`] aborts a run before any file is touched. The
/// decode, encode, quality and collision variants only ever describe a single
/// file and end up as a skipped entry in the summary.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Source directory is missing or is not a directory.
    #[error("Input folder '{path}' {reason}")]
    InvalidSource {
        /// Path given as the source directory
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// File content could not be decoded as an image.
    #[error("Cannot decode '{path}' as an image: {message}")]
    Decode {
        /// Path to the undecodable file
        path: PathBuf,
        /// Error message from the decoder
        message: String,
    },

    /// Decoded image could not be encoded as JPEG.
    #[error("Failed to encode '{path}' as JPEG: {message}")]
    Encode {
        /// Output path being encoded
        path: PathBuf,
        /// Error message from the encoder
        message: String,
    },

    /// JPEG quality outside 1..=100.
    #[error("JPEG quality {quality} is out of range (expected 1-100)")]
    InvalidQuality {
        /// The rejected quality value
        quality: u8,
    },

    /// Output name is already taken by an earlier file in the same run.
    #[error("Output '{path}' is already produced by '{existing}'")]
    NameCollision {
        /// Output path both files map to
        path: PathBuf,
        /// Name of the file that claimed the path first
        existing: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an invalid source directory error.
    #[must_use]
    pub fn invalid_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an encode error.
    #[must_use]
    pub fn encode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a name collision error.
    #[must_use]
    pub fn name_collision(path: impl Into<PathBuf>, existing: impl Into<String>) -> Self {
        Self::NameCollision {
            path: path.into(),
            existing: existing.into(),
        }
    }

    /// Classifies an error raised by the `image` crate while reading `path`.
    ///
    /// Decoders report truncated or malformed data as `UnexpectedEof` or
    /// `InvalidData` IO errors; those are decode errors. Other IO failures
    /// keep their IO identity.
    #[must_use]
    pub fn from_image_read(path: impl Into<PathBuf>, source: ImageError) -> Self {
        match source {
            ImageError::IoError(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::InvalidData
                ) =>
            {
                Self::decode(path, e.to_string())
            }
            ImageError::IoError(e) => Self::io(path, e),
            other => Self::decode(path, other.to_string()),
        }
    }

    /// Classifies an error raised by the `image` crate while writing `path`.
    #[must_use]
    pub fn from_image_write(path: impl Into<PathBuf>, source: ImageError) -> Self {
        match source {
            ImageError::IoError(e) => Self::io(path, e),
            other => Self::encode(path, other.to_string()),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is an invalid source directory error.
    #[must_use]
    pub const fn is_invalid_source(&self) -> bool {
        matches!(self, Self::InvalidSource { .. })
    }

    /// Returns true if this is an invalid quality error.
    #[must_use]
    pub const fn is_invalid_quality(&self) -> bool {
        matches!(self, Self::InvalidQuality { .. })
    }

    /// Returns true if this is a name collision error.
    #[must_use]
    pub const fn is_collision(&self) -> bool {
        matches!(self, Self::NameCollision { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
