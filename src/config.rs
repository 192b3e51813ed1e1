use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default JPEG quality when none is given.
pub const DEFAULT_QUALITY: u8 = 50;

const DEFAULT_OUTPUT_SUBDIR: &str = "output";

/// What to do when two source files map to the same `<stem>.jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Give later files a distinct name (`<stem>_<ext>.jpg`, then a counter)
    #[default]
    Disambiguate,
    /// Skip later files with a collision error
    Error,
}

/// Configuration for a conversion run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Directory whose immediate entries are converted
    pub source_dir: PathBuf,

    /// Directory receiving the JPEG files
    pub output_dir: PathBuf,

    /// JPEG quality passed to the encoder (1-100)
    pub quality: u8,

    /// Decode and encode in memory without writing anything
    pub dry_run: bool,

    /// Handling of output name collisions
    pub collision_policy: CollisionPolicy,

    /// Print a line per file to stdout
    pub print_progress: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jpegify::Config;
    ///
    /// let config = Config::builder()
    ///     .source_dir("./photos")
    ///     .quality(80)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Only the source directory is checked here. An out-of-range quality is
    /// reported against every file instead of failing the run; see
    /// [`Config::quality_in_range`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if the source directory doesn't exist
    /// or is not a directory.
    pub fn validate(&self) -> Result<()> {
        if !self.source_dir.is_dir() {
            return Err(Error::invalid_source(
                &self.source_dir,
                "does not exist or is not a directory.",
            ));
        }

        Ok(())
    }

    /// Returns true if the quality is one the JPEG encoder accepts (1-100).
    #[must_use]
    pub fn quality_in_range(&self) -> bool {
        (1..=100).contains(&self.quality)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from(".").join(DEFAULT_OUTPUT_SUBDIR),
            quality: DEFAULT_QUALITY,
            dry_run: false,
            collision_policy: CollisionPolicy::default(),
            print_progress: true,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    quality: Option<u8>,
    dry_run: bool,
    collision_policy: Option<CollisionPolicy>,
    print_progress: Option<bool>,
}

impl ConfigBuilder {
    /// Sets the directory to convert.
    #[must_use]
    pub fn source_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(path.into());
        self
    }

    /// Sets the output directory.
    ///
    /// Defaults to `<source_dir>/output`.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the JPEG quality. The value is passed to the encoder unmodified.
    #[must_use]
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Sets the collision policy.
    #[must_use]
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = Some(policy);
        self
    }

    /// Enables or disables per-file lines on stdout.
    #[must_use]
    pub fn print_progress(mut self, enabled: bool) -> Self {
        self.print_progress = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let source_dir = self.source_dir.unwrap_or_else(|| PathBuf::from("."));
        let output_dir = self
            .output_dir
            .unwrap_or_else(|| source_dir.join(DEFAULT_OUTPUT_SUBDIR));

        let config = Config {
            source_dir,
            output_dir,
            quality: self.quality.unwrap_or(DEFAULT_QUALITY),
            dry_run: self.dry_run,
            collision_policy: self.collision_policy.unwrap_or_default(),
            print_progress: self.print_progress.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
