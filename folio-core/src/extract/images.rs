//! Accepting image blocks and resolving their bytes

use super::naming::{ignored_image_filename, image_filename};
use super::region::RegionClassifier;
use crate::config::{DedupStrategy, ExtractConfig};
use crate::error::{FolioError, SourceError};
use crate::source::DocumentSource;
use crate::types::{Chapter, ImagePayload, Page, Rect};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Alt text for images taken from page blocks
pub const IMAGE_ALT: &str = "Image";

/// Regions seen on the current page. Recreated for every page.
#[derive(Debug, Default)]
pub struct PageRegions {
    ignored: Vec<Rect>,
    placed: Vec<Rect>,
}

impl PageRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a rejected image box
    pub fn ignore(&mut self, bbox: Rect) {
        self.ignored.push(bbox);
    }

    /// Remember an emitted image box
    pub fn place(&mut self, bbox: Rect) {
        self.placed.push(bbox);
    }

    pub fn is_ignored(&self, bbox: &Rect) -> bool {
        self.ignored.iter().any(|r| r.approx_eq(bbox))
    }

    pub fn is_placed(&self, bbox: &Rect) -> bool {
        self.placed.iter().any(|r| r.approx_eq(bbox))
    }
}

/// Content hashes of every image emitted so far (document-wide dedup)
#[derive(Debug, Default)]
pub struct SeenImages {
    hashes: HashSet<String>,
}

impl SeenImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `data`, returning false if identical bytes were already seen
    pub fn insert(&mut self, data: &[u8]) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(data);
        self.hashes.insert(hex::encode(hasher.finalize()))
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Mutable state threaded through the image stages of one page
pub struct PageContext<'c> {
    /// Boxes rejected or emitted on this page only
    pub regions: PageRegions,

    /// Document-wide hashes, shared across pages of a sequential run
    pub seen: &'c mut SeenImages,

    /// Chapter receiving the page's content
    pub chapter: &'c mut Chapter,
}

impl<'c> PageContext<'c> {
    /// Fresh regions for a new page
    pub fn new(seen: &'c mut SeenImages, chapter: &'c mut Chapter) -> Self {
        Self {
            regions: PageRegions::new(),
            seen,
            chapter,
        }
    }
}

/// What happened to one image block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Stored under the given filename
    Accepted(String),

    /// Dropped by position; its box joins the ignored regions
    Rejected,

    /// Bytes were already emitted elsewhere in the document
    Duplicate,

    /// Bytes could not be resolved or encoded
    Failed,
}

/// Resolve the bytes behind an image payload
pub fn resolve_payload(
    source: &dyn DocumentSource,
    payload: &ImagePayload,
) -> Result<Vec<u8>, FolioError> {
    match payload {
        ImagePayload::Bytes(data) => Ok(data.clone()),
        ImagePayload::Reference(xref) => resolve_reference(source, *xref),
        ImagePayload::Invalid(reason) => Err(SourceError::MalformedContent(reason.clone()).into()),
    }
}

/// Resolve a reference to PNG bytes, converting CMYK-like pixmaps to RGB
pub fn resolve_reference(source: &dyn DocumentSource, xref: u32) -> Result<Vec<u8>, FolioError> {
    let raw = source.resolve_image(xref)?;
    Ok(raw.to_png()?)
}

/// Decides the fate of image blocks on a page
pub struct ImageAcceptor<'a> {
    source: &'a dyn DocumentSource,
    config: &'a ExtractConfig,
    prefix: &'a str,
}

impl<'a> ImageAcceptor<'a> {
    pub fn new(source: &'a dyn DocumentSource, config: &'a ExtractConfig, prefix: &'a str) -> Self {
        Self {
            source,
            config,
            prefix,
        }
    }

    /// Handle the `index`-th image block (one-based) of `page`
    pub fn accept(
        &self,
        page: &Page,
        bbox: &Rect,
        payload: &ImagePayload,
        index: usize,
        ctx: &mut PageContext<'_>,
    ) -> ImageOutcome {
        let classifier = RegionClassifier::new(page.rect(), self.config);
        if classifier.rejects_image(bbox) {
            if self.config.debug {
                tracing::debug!("Page {}: ignored image {} at {:?}", page.number(), index, bbox);
            }
            ctx.regions.ignore(*bbox);
            if self.config.keep_ignored {
                self.keep_ignored(page, payload, index, ctx.chapter);
            }
            return ImageOutcome::Rejected;
        }

        let data = match resolve_payload(self.source, payload) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Page {}: skipping image {}: {}", page.number(), index, e);
                return ImageOutcome::Failed;
            }
        };

        if self.config.dedup == DedupStrategy::DocumentWideHash && !ctx.seen.insert(&data) {
            tracing::debug!("Page {}: image {} already emitted", page.number(), index);
            return ImageOutcome::Duplicate;
        }

        let filename = image_filename(self.prefix, page.number(), index);
        if !ctx.chapter.push_image(&filename, IMAGE_ALT, data) {
            tracing::warn!("Page {}: duplicate image name {}", page.number(), filename);
            return ImageOutcome::Duplicate;
        }
        ctx.regions.place(*bbox);
        ImageOutcome::Accepted(filename)
    }

    /// Store a rejected image outside the book so the thresholds can be inspected
    fn keep_ignored(
        &self,
        page: &Page,
        payload: &ImagePayload,
        index: usize,
        chapter: &mut Chapter,
    ) {
        match resolve_payload(self.source, payload) {
            Ok(data) => {
                chapter.add_ignored(ignored_image_filename(page.number(), index), data);
            }
            Err(e) => {
                tracing::debug!(
                    "Page {}: cannot keep ignored image {}: {}",
                    page.number(),
                    index,
                    e
                );
            }
        }
    }
}
