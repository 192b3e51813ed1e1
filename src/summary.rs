use crate::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The file was written (or would be, in dry run mode) to `output`
    Converted {
        /// Path of the JPEG file
        output: PathBuf,
    },
    /// The file was left out
    Skipped {
        /// Human-readable reason
        error: String,
    },
}

/// Outcome of converting a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    /// File name of the source entry
    pub file_name: String,

    /// Full path of the source entry
    pub source: PathBuf,

    /// What happened to it
    #[serde(flatten)]
    pub result: OutcomeKind,
}

impl FileOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn converted(
        file_name: impl Into<String>,
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
            result: OutcomeKind::Converted {
                output: output.into(),
            },
        }
    }

    /// Creates a skipped outcome.
    #[must_use]
    pub fn skipped(
        file_name: impl Into<String>,
        source: impl Into<PathBuf>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
            result: OutcomeKind::Skipped {
                error: error.into(),
            },
        }
    }

    /// Returns true if the file was converted.
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        matches!(self.result, OutcomeKind::Converted { .. })
    }

    /// Returns the error message of a skipped file.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.result {
            OutcomeKind::Skipped { error } => Some(error),
            OutcomeKind::Converted { .. } => None,
        }
    }

    /// Line printed while the batch is running.
    #[must_use]
    pub fn progress_line(&self) -> String {
        match &self.result {
            OutcomeKind::Converted { output } => {
                format!("✅ Converted: {} -> {}", self.file_name, output.display())
            }
            OutcomeKind::Skipped { error } => {
                format!("⚠️ Skipped: {} (Error: {})", self.file_name, error)
            }
        }
    }
}

/// Collected outcomes of a conversion run.
///
/// Only the pipeline can add outcomes; once returned the summary is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    source_dir: PathBuf,
    output_dir: PathBuf,
    quality: u8,
    dry_run: bool,
    processed: usize,
    skipped: usize,
    outcomes: Vec<FileOutcome>,
    started_at: String,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    duration: Duration,
}

fn serialize_secs<S>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

impl ConversionSummary {
    pub(crate) fn new(
        source_dir: PathBuf,
        output_dir: PathBuf,
        quality: u8,
        dry_run: bool,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            source_dir,
            output_dir,
            quality,
            dry_run,
            processed: 0,
            skipped: 0,
            outcomes: Vec::new(),
            started_at: started_at.to_rfc3339(),
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn record(&mut self, outcome: FileOutcome) {
        if outcome.is_converted() {
            self.processed += 1;
        } else {
            self.skipped += 1;
        }
        self.outcomes.push(outcome);
    }

    pub(crate) fn finish(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of files converted.
    #[must_use]
    pub const fn processed_count(&self) -> usize {
        self.processed
    }

    /// Number of files skipped because of an error.
    #[must_use]
    pub const fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// All outcomes in processing order.
    #[must_use]
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Outcomes of skipped files only.
    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_converted())
    }

    /// Returns true if no file was skipped.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.skipped == 0
    }

    /// Directory that was converted.
    #[must_use]
    pub fn source_dir(&self) -> &std::path::Path {
        &self.source_dir
    }

    /// Directory the JPEG files went to.
    #[must_use]
    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// JPEG quality used for the run.
    #[must_use]
    pub const fn quality(&self) -> u8 {
        self.quality
    }

    /// Whether this was a dry run.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Wall-clock duration of the run.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Renders the end-of-run report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            String::new(),
            "=== Conversion Summary ===".to_string(),
            format!("Total files processed: {}", self.processed),
        ];

        if self.all_succeeded() {
            lines.push("All files were successfully processed!".to_string());
        } else {
            lines.push(format!("Total files skipped: {}", self.skipped));
            lines.extend(self.skipped().map(|outcome| {
                format!(
                    "  - {}: {}",
                    outcome.file_name,
                    outcome.error().unwrap_or_default()
                )
            }));
        }

        if self.dry_run {
            lines.push("(dry run, no files were written)".to_string());
        }

        lines.join("\n")
    }

    /// Prints the end-of-run report to stdout.
    pub fn print_summary(&self) {
        println!("{}", self.render());
    }

    /// Serializes the summary as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
