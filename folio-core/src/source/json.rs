//! Structured page dumps stored as JSON
//!
//! The layout follows the block dictionary most PDF toolkits can export:
//! block `type` 0 is text, 1 is an image, anything else is passed through as
//! [`Block::Unrecognized`]. Embedded bytes and pixmap samples are base64.

use super::{DocumentSource, SourceLoader};
use crate::error::SourceError;
use crate::types::{Block, ImagePayload, Line, Page, RawImage, Rect, Span, TocEntry};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

const TEXT_BLOCK: i64 = 0;
const IMAGE_BLOCK: i64 = 1;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    metadata: HashMap<String, Option<String>>,

    /// `[level, title, page]` triples
    #[serde(default)]
    toc: Vec<(u32, String, i64)>,

    #[serde(default)]
    pages: Vec<RawPage>,

    #[serde(default)]
    xrefs: HashMap<u32, RawPixmap>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    width: f32,
    height: f32,

    #[serde(default)]
    blocks: Vec<RawBlock>,

    /// Page-level image enumeration, independent of `blocks`
    #[serde(default)]
    images: Vec<RawImageRef>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: i64,

    #[serde(default)]
    bbox: [f32; 4],

    #[serde(default)]
    lines: Vec<RawLine>,

    /// Base64 encoded image bytes
    #[serde(default)]
    image: Option<String>,

    #[serde(default)]
    xref: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(default)]
    spans: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    #[serde(default)]
    text: String,

    #[serde(default)]
    font: String,
}

#[derive(Debug, Deserialize)]
struct RawImageRef {
    xref: u32,

    #[serde(default)]
    bbox: Option<[f32; 4]>,
}

#[derive(Debug, Deserialize)]
struct RawPixmap {
    width: u32,
    height: u32,

    /// Channels per pixel, alpha included
    n: u8,

    #[serde(default)]
    alpha: Option<Flag>,

    /// Base64 encoded interleaved samples
    samples: String,
}

/// Toolkits disagree on whether flags are booleans or 0/1
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(n) => *n != 0,
        }
    }
}

/// Document source backed by a parsed JSON page dump
#[derive(Debug)]
pub struct JsonSource {
    doc: RawDocument,
}

impl JsonSource {
    /// Parse a page dump from bytes
    pub fn from_slice(data: &[u8]) -> Result<Self, SourceError> {
        let doc = serde_json::from_slice(data)
            .map_err(|e| SourceError::DocumentOpen(format!("Invalid page dump: {}", e)))?;
        Ok(Self { doc })
    }

    /// Build a source from an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, SourceError> {
        let doc = serde_json::from_value(value)
            .map_err(|e| SourceError::DocumentOpen(format!("Invalid page dump: {}", e)))?;
        Ok(Self { doc })
    }

    fn raw_page(&self, index: usize) -> Result<&RawPage, SourceError> {
        self.doc
            .pages
            .get(index)
            .ok_or(SourceError::PageOutOfRange(index))
    }

    fn convert_block(raw: &RawBlock) -> Block {
        let bbox = Rect::from(raw.bbox);
        match raw.kind {
            TEXT_BLOCK => Block::Text {
                bbox,
                lines: raw
                    .lines
                    .iter()
                    .map(|l| {
                        Line::new(
                            l.spans
                                .iter()
                                .map(|s| Span::new(s.text.clone(), s.font.clone()))
                                .collect(),
                        )
                    })
                    .collect(),
            },
            IMAGE_BLOCK => {
                // A broken payload only costs this image, not the page
                let payload = match (&raw.image, raw.xref) {
                    (Some(encoded), _) => match STANDARD.decode(encoded) {
                        Ok(bytes) => ImagePayload::Bytes(bytes),
                        Err(e) => ImagePayload::Invalid(format!("invalid image bytes: {}", e)),
                    },
                    (None, Some(xref)) => ImagePayload::Reference(xref),
                    (None, None) => {
                        ImagePayload::Invalid("image block without bytes or xref".to_string())
                    }
                };
                Block::Image { bbox, payload }
            }
            tag => Block::Unrecognized { tag },
        }
    }
}

impl DocumentSource for JsonSource {
    fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page, SourceError> {
        let raw = self.raw_page(index)?;
        let blocks = raw.blocks.iter().map(Self::convert_block).collect();
        Ok(Page::new(index, raw.width, raw.height).with_blocks(blocks))
    }

    fn toc(&self) -> Vec<TocEntry> {
        self.doc
            .toc
            .iter()
            .map(|(level, title, page)| TocEntry::new(*level, title.clone(), *page))
            .collect()
    }

    fn metadata(&self) -> HashMap<String, String> {
        self.doc
            .metadata
            .iter()
            .filter_map(|(k, v)| match v.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Some((k.clone(), v.to_string())),
                _ => None,
            })
            .collect()
    }

    fn image_refs(&self, page: usize) -> Vec<u32> {
        self.raw_page(page)
            .map(|p| p.images.iter().map(|r| r.xref).collect())
            .unwrap_or_default()
    }

    fn image_placement(&self, page: usize, xref: u32) -> Result<Rect, SourceError> {
        self.raw_page(page)?
            .images
            .iter()
            .find(|r| r.xref == xref)
            .and_then(|r| r.bbox)
            .map(Rect::from)
            .ok_or(SourceError::PlacementMissing { page, xref })
    }

    fn resolve_image(&self, xref: u32) -> Result<RawImage, SourceError> {
        let raw = self
            .doc
            .xrefs
            .get(&xref)
            .ok_or_else(|| SourceError::ResolutionFailure {
                xref,
                reason: "unknown xref".to_string(),
            })?;
        let samples = STANDARD
            .decode(&raw.samples)
            .map_err(|e| SourceError::ResolutionFailure {
                xref,
                reason: e.to_string(),
            })?;
        Ok(RawImage {
            width: raw.width,
            height: raw.height,
            channels: raw.n,
            alpha: raw.alpha.as_ref().is_some_and(Flag::is_set),
            samples,
        })
    }
}

/// Loader for `.json` page dumps
pub struct JsonLoader;

impl JsonLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceLoader for JsonLoader {
    fn load(&self, reader: &mut dyn Read) -> Result<Box<dyn DocumentSource>, SourceError> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| SourceError::DocumentOpen(format!("Failed to read page dump: {}", e)))?;
        Ok(Box::new(JsonSource::from_slice(&data)?))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
