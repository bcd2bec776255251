//! Structured page content supplied by a document source

use super::Rect;
use serde::{Deserialize, Serialize};

/// One page of structured content, consumed immediately by the extractor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// Zero-based page index
    pub index: usize,

    pub width: f32,

    pub height: f32,

    /// Blocks in document order
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Add blocks
    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    /// The page rectangle
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// One-based page number used in generated filenames
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// A block of page content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Text lines inside a bounding box
    Text { bbox: Rect, lines: Vec<Line> },

    /// Raster image inside a bounding box
    Image { bbox: Rect, payload: ImagePayload },

    /// A block kind the source reported but the engine does not handle
    Unrecognized { tag: i64 },
}

/// Where an image block's bytes come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ImagePayload {
    /// Encoded image bytes, used as-is
    Bytes(Vec<u8>),

    /// Opaque handle resolved through the source
    Reference(u32),

    /// The source could not read this block's payload; the reason is kept for logging
    Invalid(String),
}

/// A line of text made of styled spans
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Single-span line in a regular font
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Span::new(text, "Regular")])
    }
}

/// A run of text sharing one font
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: String,
}

impl Span {
    pub fn new(text: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
        }
    }
}
