//! Walking one page's blocks into chapter content

use super::images::{ImageAcceptor, ImageOutcome, PageContext, SeenImages};
use super::paragraph::ParagraphMerger;
use super::recovery::MissedImageRecovery;
use super::region::RegionClassifier;
use crate::config::ExtractConfig;
use crate::source::DocumentSource;
use crate::types::{Block, Chapter, Page};
use std::ops::Range;

/// Per-page counters, mostly useful for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    pub paragraphs: usize,
    pub dropped_text: usize,
    pub image_blocks: usize,
    pub images: usize,
    pub recovered: usize,
    pub unrecognized: usize,
}

/// Drives region classification, paragraph merging and image handling over pages
pub struct PageContentExtractor<'a> {
    source: &'a dyn DocumentSource,
    config: &'a ExtractConfig,
    prefix: &'a str,
}

impl<'a> PageContentExtractor<'a> {
    pub fn new(source: &'a dyn DocumentSource, config: &'a ExtractConfig, prefix: &'a str) -> Self {
        Self {
            source,
            config,
            prefix,
        }
    }

    /// Append every page in `pages` to `chapter`, in ascending order.
    ///
    /// A page the source cannot produce is logged and skipped.
    pub fn extract_range(&self, pages: Range<usize>, chapter: &mut Chapter, seen: &mut SeenImages) {
        for index in pages {
            let page = match self.source.page(index) {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("Skipping page {}: {}", index + 1, e);
                    continue;
                }
            };
            let stats = self.extract_page(&page, chapter, seen);
            tracing::debug!("Page {}: {:?}", page.number(), stats);
        }
    }

    /// Append one page's content to `chapter`
    pub fn extract_page(
        &self,
        page: &Page,
        chapter: &mut Chapter,
        seen: &mut SeenImages,
    ) -> PageStats {
        let classifier = RegionClassifier::new(page.rect(), self.config);
        let acceptor = ImageAcceptor::new(self.source, self.config, self.prefix);
        let mut ctx = PageContext::new(seen, chapter);
        let mut stats = PageStats::default();

        for block in &page.blocks {
            match block {
                Block::Text { bbox, lines } => {
                    if !classifier.keeps_text(bbox) {
                        if self.config.debug {
                            tracing::debug!(
                                "Page {}: dropped header/footer text at {:?}",
                                page.number(),
                                bbox
                            );
                        }
                        stats.dropped_text += 1;
                        continue;
                    }
                    for paragraph in ParagraphMerger::merge(lines) {
                        ctx.chapter.push(paragraph);
                        stats.paragraphs += 1;
                    }
                }
                Block::Image { bbox, payload } => {
                    stats.image_blocks += 1;
                    let outcome =
                        acceptor.accept(page, bbox, payload, stats.image_blocks, &mut ctx);
                    if matches!(outcome, ImageOutcome::Accepted(_)) {
                        stats.images += 1;
                    }
                }
                Block::Unrecognized { tag } => {
                    tracing::error!("Page {}: unrecognized block type {}", page.number(), tag);
                    stats.unrecognized += 1;
                }
            }
        }

        let recovery = MissedImageRecovery::new(self.source, self.config, self.prefix);
        stats.recovered = recovery.recover(page, stats.image_blocks, &mut ctx).len();

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonSource;
    use serde_json::json;

    fn source() -> JsonSource {
        JsonSource::from_value(json!({
            "pages": [{
                "width": 600.0, "height": 800.0,
                "blocks": [
                    {"type": 0, "bbox": [50, 20, 550, 40],
                     "lines": [{"spans": [{"text": "Running Header", "font": "Sans"}]}]},
                    {"type": 0, "bbox": [50, 100, 550, 200],
                     "lines": [{"spans": [{"text": "First", "font": "Serif"}]},
                               {"spans": [{"text": "line.", "font": "Serif"}]}]},
                    {"type": 1, "bbox": [100, 250, 500, 450], "image": "AQ=="},
                    {"type": 9, "bbox": [0, 0, 1, 1]},
                    {"type": 0, "bbox": [50, 500, 550, 600],
                     "lines": [{"spans": [{"text": "After.", "font": "Serif"}]}]},
                    {"type": 1, "bbox": [100, 700, 200, 720], "image": "Ag=="},
                    {"type": 0, "bbox": [280, 770, 320, 790],
                     "lines": [{"spans": [{"text": "12", "font": "Serif"}]}]}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_page_walk_in_document_order() {
        let source = source();
        let config = ExtractConfig::default();
        let extractor = PageContentExtractor::new(&source, &config, "bk");
        let mut chapter = Chapter::new("c");

        let page = source.page(0).unwrap();
        let stats = extractor.extract_page(&page, &mut chapter, &mut SeenImages::new());

        assert_eq!(
            chapter.html(),
            "<p>First line.</p>\n\
             <img src=\"images/bk-page_1-image_1.png\" alt=\"Image\"/>\n\
             <p>After.</p>\n"
        );
        assert_eq!(
            stats,
            PageStats {
                paragraphs: 2,
                dropped_text: 2,
                image_blocks: 2,
                images: 1,
                recovered: 0,
                unrecognized: 1,
            }
        );
        assert_eq!(chapter.images.len(), 1);
    }

    #[test]
    fn test_missing_page_is_skipped() {
        let source = source();
        let config = ExtractConfig::default();
        let extractor = PageContentExtractor::new(&source, &config, "bk");
        let mut chapter = Chapter::new("c");

        // only page index 0 exists
        extractor.extract_range(0..3, &mut chapter, &mut SeenImages::new());
        assert_eq!(chapter.fragments.len(), 3);
    }
}
