//! Error types for Folio Core

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a document source while reading pages or images
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot open document: {0}")]
    DocumentOpen(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Page {0} is out of range")]
    PageOutOfRange(usize),

    #[error("Malformed content: {0}")]
    MalformedContent(String),

    #[error("Cannot resolve image xref {xref}: {reason}")]
    ResolutionFailure { xref: u32, reason: String },

    #[error("Image xref {xref} has no placement on page {page}")]
    PlacementMissing { page: usize, xref: u32 },
}

/// Errors that occur while encoding images or packaging the book
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),
}
