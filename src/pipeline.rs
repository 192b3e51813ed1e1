use crate::{
    config::Config,
    encoder::JpegConverter,
    error::{Error, Result},
    file::SourceFile,
    naming::OutputNamer,
    scanner::{ScanEntry, Scanner},
    summary::{ConversionSummary, FileOutcome},
};
use chrono::Local;
use std::fs;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Converts every image of a directory into JPEG, one file at a time.
pub struct BatchConverter {
    config: Config,
    scanner: Scanner,
    converter: JpegConverter,
}

impl BatchConverter {
    /// Creates a new batch converter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if the source directory doesn't exist
    /// or is not a directory.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        if !config.quality_in_range() {
            warn!(
                "JPEG quality {} is outside 1-100, every file will be skipped",
                config.quality
            );
        }

        let scanner = Scanner::new(&config);
        let converter = JpegConverter::new(config.quality, config.dry_run);

        Ok(Self {
            config,
            scanner,
            converter,
        })
    }

    /// Runs the conversion and returns the summary.
    ///
    /// # Process
    ///
    /// 1. Creates the output directory (unless in dry run mode)
    /// 2. Lists the immediate, non-directory entries of the source directory
    /// 3. Converts each entry, recording a converted or skipped outcome
    ///
    /// A file that fails to convert never stops the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created or the
    /// source directory cannot be listed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jpegify::{BatchConverter, Config};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .source_dir("./photos")
    ///     .build()?;
    ///
    /// let summary = BatchConverter::new(config)?.run()?;
    /// summary.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(source_dir = %self.config.source_dir.display()))]
    pub fn run(self) -> Result<ConversionSummary> {
        let start_time = Instant::now();
        let mut summary = ConversionSummary::new(
            self.config.source_dir.clone(),
            self.config.output_dir.clone(),
            self.config.quality,
            self.config.dry_run,
            Local::now(),
        );

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
        } else {
            fs::create_dir_all(&self.config.output_dir)
                .map_err(|e| Error::io(&self.config.output_dir, e))?;
        }

        let entries = self.scanner.scan()?;
        info!(
            "Converting {} files to {} at quality {}",
            entries.len(),
            self.config.output_dir.display(),
            self.config.quality
        );

        let mut namer = OutputNamer::new(&self.config.output_dir, self.config.collision_policy);

        for entry in entries {
            let outcome = match entry {
                ScanEntry::File(file) => self.convert_one(&file, &mut namer),
                ScanEntry::Unreadable { name, error } => self.unreadable_outcome(name, &error),
            };

            if self.config.print_progress {
                println!("{}", outcome.progress_line());
            }
            summary.record(outcome);
        }

        let summary = summary.finish(start_time.elapsed());

        info!(
            "✓ Finished in {:.2}s: {} processed, {} skipped",
            summary.duration().as_secs_f64(),
            summary.processed_count(),
            summary.skipped_count()
        );

        Ok(summary)
    }

    /// Converts one file, folding any failure into a skipped outcome.
    fn convert_one(&self, file: &SourceFile, namer: &mut OutputNamer) -> FileOutcome {
        let result = namer
            .assign(file)
            .and_then(|output| self.converter.convert_file(&file.path, &output).map(|()| output));

        match result {
            Ok(output) => {
                debug!("Converted {} -> {}", file.name, output.display());
                FileOutcome::converted(&file.name, &file.path, output)
            }
            Err(e) => {
                debug!("Skipped {}: {}", file.name, e);
                FileOutcome::skipped(&file.name, &file.path, e.to_string())
            }
        }
    }

    /// Reports an entry the listing could not read as skipped.
    fn unreadable_outcome(&self, name: String, error: &Error) -> FileOutcome {
        let source = match error {
            Error::Io { path, .. } => path.clone(),
            _ => self.config.source_dir.join(&name),
        };
        FileOutcome::skipped(name, source, error.to_string())
    }
}
