//! Single file conversion

use super::{is_supported, process_file, Options};
use anyhow::{bail, Context, Result};
use folio_core::encoder::encoder_for_format;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Convert one page dump into `{output_dir}/{stem}.epub`
pub fn convert(input: &Path, output_dir: &Path, options: &Options) -> Result<()> {
    if !input.exists() {
        bail!("Input not found: {}", input.display());
    }
    if !is_supported(input) {
        bail!("Unsupported input file: {}", input.display());
    }

    let encoder = encoder_for_format("epub").context("No EPUB encoder available")?;

    // Set up progress bar with animation
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", input.display()));

    match process_file(input, output_dir, &*encoder, options) {
        Ok(output_file) => {
            pb.finish_with_message(format!(
                "Converted {} -> {}",
                input.display(),
                output_file.display()
            ));
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message(format!("Failed to convert {}", input.display()));
            Err(e)
        }
    }
}
