//! The assembled book handed to an encoder

use super::{Chapter, Metadata};
use serde::{Deserialize, Serialize};

/// Cover image picked from the extracted images
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cover {
    pub filename: String,
    pub data: Vec<u8>,
}

/// The complete book representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Book metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Chapters in TOC order
    pub chapters: Vec<Chapter>,

    /// Optional cover image
    pub cover: Option<Cover>,
}

impl Book {
    /// Create a new book with the given title and language
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self::with_metadata(Metadata::new(title, language))
    }

    /// Create a book with existing metadata
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata,
            chapters: Vec::new(),
            cover: None,
        }
    }

    /// Add a chapter to the book
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Get the book title
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Total number of images across all chapters
    pub fn image_count(&self) -> usize {
        self.chapters.iter().map(|c| c.images.len()).sum()
    }

    /// Every image in chapter order
    pub fn images(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.chapters.iter().flat_map(|c| c.images.iter())
    }

    /// Every image the position filters rejected, when they were kept
    pub fn ignored_images(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.chapters.iter().flat_map(|c| c.ignored.iter())
    }
}
