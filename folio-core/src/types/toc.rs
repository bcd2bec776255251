//! Table of contents types

use serde::{Deserialize, Serialize};

/// A single entry in the source document's table of contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Display title
    pub title: String,

    /// One-based page the entry starts on
    pub start_page: i64,
}

impl TocEntry {
    /// Create a new TOC entry
    pub fn new(level: u32, title: impl Into<String>, start_page: i64) -> Self {
        Self {
            level,
            title: title.into(),
            start_page,
        }
    }
}
