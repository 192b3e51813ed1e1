//! # jpegify
//!
//! Converts every image in a directory into a JPEG file at a fixed quality.
//!
//! ## Features
//!
//! - Image format detected from file content, not extension
//! - Transparency and palettes flattened to RGB before encoding
//! - One bad file never stops the batch; it is reported as skipped
//! - Deterministic, collision-free output names
//! - Dry run mode and a JSON summary
//!
//! ## Quick Start
//!
//! ```no_run
//! use jpegify::convert;
//!
//! # fn main() -> anyhow::Result<()> {
//! let summary = convert("./photos", "./photos/output", 50)?;
//! summary.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Scanner**: Lists the immediate, non-directory entries of the source
//! 2. **Namer**: Picks an unused `<stem>.jpg` for each entry
//! 3. **Encoder**: Decodes, converts to RGB and writes the JPEG
//! 4. **Summary**: Collects a converted or skipped outcome per entry

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod encoder;
mod error;
mod file;
mod naming;
mod pipeline;
mod scanner;
mod summary;

pub use config::{CollisionPolicy, Config, ConfigBuilder, DEFAULT_QUALITY};
pub use error::{Error, Result};
pub use pipeline::BatchConverter;
pub use summary::{ConversionSummary, FileOutcome, OutcomeKind};

use std::path::PathBuf;

/// Converts the images in `source` into JPEG files under `destination`.
///
/// This is the main entry point for the library. The destination directory is
/// created if needed. Files that cannot be converted are recorded as skipped
/// in the returned summary.
///
/// # Errors
///
/// Returns an error if:
/// - `source` doesn't exist or is not a directory
/// - `destination` cannot be created
/// - `source` cannot be listed
///
/// # Examples
///
/// ```no_run
/// use jpegify::convert;
///
/// # fn main() -> anyhow::Result<()> {
/// let summary = convert("./scans", "./scans/jpeg", 80)?;
/// assert_eq!(summary.skipped_count(), 0);
/// # Ok(())
/// # }
/// ```
pub fn convert(
    source: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
    quality: u8,
) -> Result<ConversionSummary> {
    let config = Config::builder()
        .source_dir(source)
        .output_dir(destination)
        .quality(quality)
        .build()?;

    run(config)
}

/// Runs a conversion with a full configuration.
///
/// # Errors
///
/// See [`convert`].
pub fn run(config: Config) -> Result<ConversionSummary> {
    BatchConverter::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_convert_entry_point() {
        let temp = assert_fs::TempDir::new().unwrap();
        let src = temp.child("src");
        src.create_dir_all().unwrap();
        image::RgbImage::from_pixel(2, 2, image::Rgb([0, 128, 255]))
            .save_with_format(src.child("pixel.png").path(), image::ImageFormat::Png)
            .unwrap();
        src.child("readme.md").write_str("# not an image").unwrap();

        let summary = convert(src.path(), temp.child("out").path(), DEFAULT_QUALITY).unwrap();

        assert_eq!(summary.processed_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.quality(), DEFAULT_QUALITY);
        assert!(temp.child("out/pixel.jpg").path().is_file());
    }

    #[test]
    fn test_convert_rejects_missing_source() {
        let temp = assert_fs::TempDir::new().unwrap();

        let err = convert(temp.child("nope").path(), temp.child("out").path(), 50).unwrap_err();

        assert!(err.is_invalid_source());
        assert!(!temp.child("out").path().exists());
    }
}
