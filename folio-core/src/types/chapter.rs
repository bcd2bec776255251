//! Chapter type: a titled page range turned into markup plus images

use super::Fragment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single chapter of an assembled book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// TOC nesting level (1 = top level)
    pub level: u32,

    /// Content in document order
    pub fragments: Vec<Fragment>,

    /// Image bytes keyed by generated filename, in insertion order
    pub images: IndexMap<String, Vec<u8>>,

    /// Images rejected by position; never rendered or packaged
    #[serde(default)]
    pub ignored: IndexMap<String, Vec<u8>>,
}

impl Chapter {
    /// Create a new top-level chapter with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level: 1,
            fragments: Vec::new(),
            images: IndexMap::new(),
            ignored: IndexMap::new(),
        }
    }

    /// Set the TOC level
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Append a fragment
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Store image bytes under `filename`.
    ///
    /// Returns false and leaves the map untouched when the name is taken.
    pub fn add_image(&mut self, filename: impl Into<String>, data: Vec<u8>) -> bool {
        let filename = filename.into();
        if self.images.contains_key(&filename) {
            return false;
        }
        self.images.insert(filename, data);
        true
    }

    /// Append an image fragment and its bytes together
    pub fn push_image(&mut self, filename: &str, alt: &str, data: Vec<u8>) -> bool {
        if !self.add_image(filename, data) {
            return false;
        }
        self.push(Fragment::image(filename, alt));
        true
    }

    /// Keep a rejected image for later inspection
    pub fn add_ignored(&mut self, filename: impl Into<String>, data: Vec<u8>) {
        self.ignored.entry(filename.into()).or_insert(data);
    }

    /// Rendered chapter body
    pub fn html(&self) -> String {
        self.fragments.iter().map(Fragment::to_xhtml).collect()
    }

    /// Whether nothing was extracted into this chapter
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.images.is_empty()
    }
}
