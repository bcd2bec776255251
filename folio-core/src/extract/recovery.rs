//! Recovering images the block enumeration missed
//!
//! Sources can report more image references for a page than they emit image
//! blocks. When that happens every reference is re-examined and the ones that
//! were neither rejected nor already placed are appended to the chapter.

use super::images::{resolve_reference, PageContext};
use super::naming::full_image_filename;
use super::region::RegionClassifier;
use crate::config::{DedupStrategy, ExtractConfig};
use crate::source::DocumentSource;
use crate::types::Page;

/// Alt text for recovered images
pub const FULL_IMAGE_ALT: &str = "Full Image";

/// Placements shorter than this are rules and spacers, not pictures
pub const MIN_PLACEMENT_HEIGHT: f32 = 5.0;

pub struct MissedImageRecovery<'a> {
    source: &'a dyn DocumentSource,
    config: &'a ExtractConfig,
    prefix: &'a str,
}

impl<'a> MissedImageRecovery<'a> {
    pub fn new(source: &'a dyn DocumentSource, config: &'a ExtractConfig, prefix: &'a str) -> Self {
        Self {
            source,
            config,
            prefix,
        }
    }

    /// Reconcile `img_count` image blocks against the page's references.
    ///
    /// Returns the filenames of recovered images.
    pub fn recover(&self, page: &Page, img_count: usize, ctx: &mut PageContext<'_>) -> Vec<String> {
        let refs = self.source.image_refs(page.index);
        if img_count >= refs.len() {
            return Vec::new();
        }
        tracing::debug!(
            "Page {}: {} image blocks but {} references",
            page.number(),
            img_count,
            refs.len()
        );

        let classifier = RegionClassifier::new(page.rect(), self.config);
        let mut recovered = Vec::new();

        for (i, xref) in refs.into_iter().enumerate() {
            let index = i + 1;
            if xref == 0 {
                continue;
            }

            let placement = match self.source.image_placement(page.index, xref) {
                Ok(rect) => rect,
                Err(e) => {
                    tracing::warn!("Page {}: skipping reference {}: {}", page.number(), index, e);
                    continue;
                }
            };

            if placement.height() < MIN_PLACEMENT_HEIGHT
                || classifier.below_image_threshold(&placement)
            {
                continue;
            }
            if ctx.regions.is_ignored(&placement) {
                continue;
            }
            let already_placed = ctx.regions.is_placed(&placement);
            if self.config.dedup == DedupStrategy::PerPageBBox && already_placed {
                continue;
            }

            let data = match resolve_reference(self.source, xref) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Page {}: skipping reference {}: {}", page.number(), index, e);
                    continue;
                }
            };

            if self.config.dedup == DedupStrategy::DocumentWideHash && !ctx.seen.insert(&data) {
                continue;
            }

            let filename = full_image_filename(self.prefix, page.number(), index);
            if ctx.chapter.push_image(&filename, FULL_IMAGE_ALT, data) {
                tracing::info!("Page {}: recovered missed image {}", page.number(), filename);
                recovered.push(filename);
            }
        }

        recovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonSource;
    use crate::extract::images::SeenImages;
    use crate::types::{Chapter, Rect};
    use serde_json::json;

    const PIXEL: &str = "/wAA"; // one red RGB pixel

    fn source() -> JsonSource {
        JsonSource::from_value(json!({
            "pages": [{
                "width": 600.0, "height": 800.0,
                "images": [
                    {"xref": 0, "bbox": [100, 100, 300, 300]},
                    {"xref": 1, "bbox": [100, 100, 300, 300]},
                    {"xref": 2, "bbox": [100, 400, 300, 402]},
                    {"xref": 3, "bbox": [100, 650, 300, 700]},
                    {"xref": 4},
                    {"xref": 5, "bbox": [50, 80, 250, 200]},
                    {"xref": 6, "bbox": [300, 300, 500, 500]},
                    {"xref": 7, "bbox": [100, 420, 200, 500]}
                ]
            }],
            "xrefs": {
                "1": {"width": 1, "height": 1, "n": 3, "samples": PIXEL},
                "2": {"width": 1, "height": 1, "n": 3, "samples": PIXEL},
                "3": {"width": 1, "height": 1, "n": 3, "samples": PIXEL},
                "5": {"width": 1, "height": 1, "n": 3, "samples": PIXEL},
                "6": {"width": 1, "height": 1, "n": 3, "samples": PIXEL}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_recovers_only_eligible_references() {
        let source = source();
        let config = ExtractConfig::default();
        let recovery = MissedImageRecovery::new(&source, &config, "vol");
        let page = Page::new(0, 600.0, 800.0);
        let mut seen = SeenImages::new();
        let mut chapter = Chapter::new("c");
        let mut ctx = PageContext::new(&mut seen, &mut chapter);
        ctx.regions.ignore(Rect::new(50.0, 80.0, 250.0, 200.0));

        let recovered = recovery.recover(&page, 0, &mut ctx);

        // skipped: null xref, too short, bottom of page, no placement,
        // ignored region, unresolvable
        assert_eq!(
            recovered,
            vec!["vol-page_1-full_2.png", "vol-page_1-full_7.png"]
        );
        assert_eq!(chapter.images.len(), 2);
        assert_eq!(
            chapter.html(),
            "<img src=\"images/vol-page_1-full_2.png\" alt=\"Full Image\"/>\n\
             <img src=\"images/vol-page_1-full_7.png\" alt=\"Full Image\"/>\n"
        );
    }

    #[test]
    fn test_no_recovery_when_counts_match() {
        let source = source();
        let config = ExtractConfig::default();
        let recovery = MissedImageRecovery::new(&source, &config, "vol");
        let page = Page::new(0, 600.0, 800.0);
        let mut seen = SeenImages::new();
        let mut chapter = Chapter::new("c");

        let recovered = recovery.recover(&page, 8, &mut PageContext::new(&mut seen, &mut chapter));
        assert!(recovered.is_empty());
        assert!(chapter.is_empty());
    }

    #[test]
    fn test_placed_regions_are_not_recovered_twice() {
        let source = source();
        let config = ExtractConfig::default();
        let recovery = MissedImageRecovery::new(&source, &config, "vol");
        let page = Page::new(0, 600.0, 800.0);
        let mut seen = SeenImages::new();
        let mut chapter = Chapter::new("c");
        let mut ctx = PageContext::new(&mut seen, &mut chapter);
        ctx.regions.place(Rect::new(100.0, 100.0, 300.0, 300.0));

        // xref 1 sits on the placed box; xref 5 is eligible here since nothing ignores it
        let recovered = recovery.recover(&page, 1, &mut ctx);
        assert_eq!(
            recovered,
            vec!["vol-page_1-full_6.png", "vol-page_1-full_7.png"]
        );
    }

    #[test]
    fn test_hash_dedup_skips_identical_bytes() {
        let source = source();
        let config = ExtractConfig::default().with_dedup(DedupStrategy::DocumentWideHash);
        let recovery = MissedImageRecovery::new(&source, &config, "vol");
        let page = Page::new(0, 600.0, 800.0);
        let mut seen = SeenImages::new();
        let mut chapter = Chapter::new("c");

        // every resolvable xref shares the same pixel
        let recovered = recovery.recover(&page, 0, &mut PageContext::new(&mut seen, &mut chapter));
        assert_eq!(recovered, vec!["vol-page_1-full_2.png"]);
        assert_eq!(seen.len(), 1);
    }
}
