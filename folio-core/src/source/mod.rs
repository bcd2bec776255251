//! Document sources: the structured page content the engine consumes

mod json;

pub use json::{JsonLoader, JsonSource};

use crate::error::SourceError;
use crate::types::{Page, RawImage, Rect, TocEntry};
use std::collections::HashMap;
use std::io::Read;

/// Page-structure provider for one open document
pub trait DocumentSource: Send + Sync {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Structured content of one page (zero-based)
    fn page(&self, index: usize) -> Result<Page, SourceError>;

    /// Table of contents in source order
    fn toc(&self) -> Vec<TocEntry>;

    /// Document metadata; at least `title` and `author` when known
    fn metadata(&self) -> HashMap<String, String>;

    /// Image references on a page, enumerated independently of its blocks
    fn image_refs(&self, page: usize) -> Vec<u32>;

    /// Where a referenced image is drawn on a page
    fn image_placement(&self, page: usize, xref: u32) -> Result<Rect, SourceError>;

    /// Pixel data behind an image reference
    fn resolve_image(&self, xref: u32) -> Result<RawImage, SourceError>;
}

/// Trait for opening an input format as a [`DocumentSource`]
pub trait SourceLoader: Send + Sync {
    /// Load a document from a reader
    fn load(&self, reader: &mut dyn Read) -> Result<Box<dyn DocumentSource>, SourceError>;

    /// File extensions this loader supports
    fn supported_extensions(&self) -> &[&str];
}

/// Get the appropriate loader for a file extension
pub fn loader_for_extension(ext: &str) -> Option<Box<dyn SourceLoader>> {
    match ext.to_lowercase().as_str() {
        "json" => Some(Box::new(JsonLoader::new())),
        _ => None,
    }
}
