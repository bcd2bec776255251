//! CLI command implementations

mod batch;
mod convert;

pub use batch::batch;
pub use convert::convert;

use anyhow::{Context, Result};
use folio_core::encoder::Encoder;
use folio_core::{loader_for_extension, Book, Chapterizer, ExtractConfig};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Settings shared by every input of a run
pub struct Options {
    pub config: ExtractConfig,
    pub save_images: bool,
}

/// Whether a path has an extension some loader accepts
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| loader_for_extension(ext).is_some())
        .unwrap_or(false)
}

/// Load one input and assemble its book
fn build_book(input_path: &Path, config: &ExtractConfig) -> Result<Book> {
    let ext = input_path
        .extension()
        .and_then(|e| e.to_str())
        .context("Could not determine input file extension")?;

    let loader = loader_for_extension(ext)
        .with_context(|| format!("No loader available for .{} files", ext))?;

    let file = File::open(input_path)
        .with_context(|| format!("Failed to open input file: {}", input_path.display()))?;
    let mut reader = BufReader::new(file);

    let source = loader
        .load(&mut reader)
        .with_context(|| format!("Failed to load {}", input_path.display()))?;

    let book = Chapterizer::new(config.clone()).build_book(&*source, file_stem(input_path)?);

    tracing::info!(
        "Extracted '{}': {} chapters, {} images",
        book.title(),
        book.chapters.len(),
        book.image_count()
    );

    Ok(book)
}

fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .context("Could not determine output filename from input")
}

/// Build, package and optionally dump the images of one input.
///
/// Returns the path of the written book.
fn process_file(
    input_path: &Path,
    output_dir: &Path,
    encoder: &dyn Encoder,
    options: &Options,
) -> Result<PathBuf> {
    let book = build_book(input_path, &options.config)?;
    let stem = file_stem(input_path)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    // Encode in memory so a failed packaging step leaves nothing behind
    let mut encoded = Vec::new();
    encoder
        .encode(&book, &mut encoded)
        .with_context(|| format!("Failed to encode to {}", encoder.format_name()))?;

    let output_file = output_dir.join(format!("{}.{}", stem, encoder.file_extension()));
    fs::write(&output_file, encoded)
        .with_context(|| format!("Failed to write output file: {}", output_file.display()))?;

    if options.save_images {
        let image_dir = output_dir.join(format!("images_{}", stem));
        save_images(book.images(), &image_dir)?;
        if options.config.keep_ignored {
            save_images(book.ignored_images(), &image_dir.join("ignored"))?;
        }
    }

    tracing::info!("Converted {:?} -> {:?}", input_path, output_file);
    Ok(output_file)
}

fn save_images<'b>(
    images: impl Iterator<Item = (&'b String, &'b Vec<u8>)>,
    dir: &Path,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut count = 0;
    for (filename, data) in images {
        let path = dir.join(filename);
        fs::write(&path, data)
            .with_context(|| format!("Failed to write image {}", path.display()))?;
        count += 1;
    }
    tracing::debug!("Saved {} images to {:?}", count, dir);
    Ok(())
}
