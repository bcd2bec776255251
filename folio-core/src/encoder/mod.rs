//! Encoders for packaging an assembled book

mod epub;

pub use epub::EpubEncoder;

use crate::error::ConversionError;
use crate::types::Book;
use std::io::Write;

/// Trait for encoding books to output formats
pub trait Encoder: Send + Sync {
    /// Encode a book to a writer
    fn encode(&self, book: &Book, writer: &mut dyn Write) -> Result<(), ConversionError>;

    /// Format name (e.g., "EPUB")
    fn format_name(&self) -> &str;

    /// File extension for this format
    fn file_extension(&self) -> &str;
}

/// Get an encoder by format name
pub fn encoder_for_format(format: &str) -> Option<Box<dyn Encoder>> {
    match format.to_lowercase().as_str() {
        "epub" => Some(Box::new(EpubEncoder::new())),
        _ => None,
    }
}
