//! Book metadata types

use serde::{Deserialize, Serialize};

/// Author recorded when the source has none
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Book-level metadata handed to the packager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    /// Book title
    pub title: String,

    /// Authors/creators
    pub creator: Vec<String>,

    /// Language code (ISO 639-1)
    pub language: String,

    /// UUID identifier
    pub identifier: String,
}

impl Metadata {
    /// Create new metadata with required fields
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            creator: Vec::new(),
            language: language.into(),
            identifier: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Add an author/creator
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator.push(creator.into());
        self
    }

    /// Primary author, or [`UNKNOWN_AUTHOR`]
    pub fn author(&self) -> &str {
        self.creator
            .first()
            .map(|s| s.as_str())
            .unwrap_or(UNKNOWN_AUTHOR)
    }
}
