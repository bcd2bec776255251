//! Folio CLI - Turn structured page dumps into chaptered EPUBs

mod commands;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use folio_core::{DedupStrategy, ExtractConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Duplicate image policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dedup {
    /// Skip images drawn over an already handled box on the same page
    PerPageBbox,
    /// Skip images whose bytes were already written anywhere in the book
    DocumentHash,
}

impl From<Dedup> for DedupStrategy {
    fn from(dedup: Dedup) -> Self {
        match dedup {
            Dedup::PerPageBbox => DedupStrategy::PerPageBBox,
            Dedup::DocumentHash => DedupStrategy::DocumentWideHash,
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input page dump, or a directory of them
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Also write extracted images to images_<name>/ next to the EPUB;
    /// with --debug, rejected images go to images_<name>/ignored/
    #[arg(long)]
    save_images: bool,

    /// Height of the header/footer bands in page units
    #[arg(long, default_value_t = folio_core::config::DEFAULT_HEADER_THRESHOLD)]
    header_threshold: f32,

    /// Drop images starting below this fraction of the page height
    #[arg(long, default_value_t = folio_core::config::DEFAULT_IMG_THRESHOLD)]
    img_threshold: f32,

    /// Prefix for image filenames (defaults to the book title)
    #[arg(long)]
    img_prefix: Option<String>,

    /// Verbose per-block logging
    #[arg(long)]
    debug: bool,

    /// Duplicate image policy
    #[arg(long, value_enum, default_value_t = Dedup::PerPageBbox)]
    dedup: Dedup,

    /// Extract chapters in parallel
    #[arg(long)]
    parallel: bool,

    /// Number of worker threads (must be at least 1)
    #[arg(short, long, value_parser = parse_jobs)]
    jobs: Option<usize>,
}

impl Cli {
    fn extract_config(&self) -> ExtractConfig {
        let mut config = ExtractConfig::new()
            .with_header_threshold(self.header_threshold)
            .with_img_threshold(self.img_threshold)
            .with_dedup(self.dedup.into())
            .with_parallel(self.parallel)
            .with_debug(self.debug)
            .with_keep_ignored(self.save_images && self.debug);
        if let Some(prefix) = &self.img_prefix {
            config = config.with_img_prefix(prefix.clone());
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok(); // Ignore if already configured
    }

    let options = commands::Options {
        config: cli.extract_config(),
        save_images: cli.save_images,
    };

    if cli.input.is_dir() {
        commands::batch(&cli.input, &cli.output, &options)
    } else {
        commands::convert(&cli.input, &cli.output, &options)
    }
}
