use anyhow::Context;
use clap::Parser;
use jpegify::{BatchConverter, CollisionPolicy, Config, DEFAULT_QUALITY};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "jpegify",
    version,
    author,
    about = "Convert every image in a directory to JPEG",
    long_about = "Convert every image in a directory to JPEG at a fixed quality.\n\n\
    Each file directly inside the source directory is decoded (the format is \
    detected from its content), flattened to RGB and written as <name>.jpg. \
    Files that are not images are reported and skipped; subdirectories are ignored.\n\n\
    USAGE EXAMPLES:\n  \
      # Convert the current directory into ./output\n  \
      jpegify\n\n  \
      # Convert a folder with stronger compression\n  \
      jpegify --dir ~/Desktop --quality 30\n\n  \
      # See what would happen, as JSON\n  \
      jpegify --dir ./scans --dry-run --json"
)]
struct Cli {
    /// Directory containing the images to convert
    #[arg(short, long, default_value = ".", value_name = "PATH")]
    dir: PathBuf,

    /// Output directory for JPEG files [default: <DIR>/output]
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// JPEG quality, 1 (smallest) to 100 (best)
    #[arg(short, long, default_value_t = DEFAULT_QUALITY)]
    quality: u8,

    /// What to do when two files share a name stem
    #[arg(long, value_enum, default_value = "disambiguate")]
    on_collision: CliCollision,

    /// Dry run (decode and encode, but don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliCollision {
    /// Write later files as <stem>_<ext>.jpg
    Disambiguate,
    /// Skip later files with an error
    Error,
}

impl From<CliCollision> for CollisionPolicy {
    fn from(c: CliCollision) -> Self {
        match c {
            CliCollision::Disambiguate => Self::Disambiguate,
            CliCollision::Error => Self::Error,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<jpegify::Error>() {
                Some(err) if err.is_invalid_source() => eprintln!("❌ Error: {err}"),
                _ => eprintln!("❌ Unexpected error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut builder = Config::builder()
        .source_dir(cli.dir)
        .quality(cli.quality)
        .collision_policy(cli.on_collision.into())
        .dry_run(cli.dry_run)
        .print_progress(!cli.json);

    if let Some(out) = cli.out {
        builder = builder.output_dir(out);
    }

    let config = builder.build()?;

    let summary = BatchConverter::new(config)?
        .run()
        .context("Conversion failed")?;

    if cli.json {
        println!("{}", summary.to_json().context("Failed to serialize summary")?);
    } else {
        summary.print_summary();
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("jpegify=warn"),
        1 => EnvFilter::new("jpegify=info"),
        2 => EnvFilter::new("jpegify=debug"),
        _ => EnvFilter::new("jpegify=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
