//! Geometric predicates deciding which blocks belong to the page body

use crate::config::ExtractConfig;
use crate::types::Rect;

/// Share of the page area at which an image counts as full-page
pub const FULL_PAGE_AREA_RATIO: f32 = 0.7;

/// Share of both page width and height at which an image counts as full-page
pub const FULL_PAGE_SIDE_RATIO: f32 = 0.8;

/// Whether a box starts inside the header or footer band
pub fn in_header_footer(bbox: &Rect, page_height: f32, threshold: f32) -> bool {
    bbox.y0 <= threshold || bbox.y0 >= page_height - threshold
}

/// Whether a box covers most of the page
pub fn is_full_page(bbox: &Rect, page: &Rect) -> bool {
    let page_area = page.area();
    if page_area <= 0.0 {
        return false;
    }
    if bbox.area() / page_area >= FULL_PAGE_AREA_RATIO {
        return true;
    }
    bbox.width() / page.width() >= FULL_PAGE_SIDE_RATIO
        && bbox.height() / page.height() >= FULL_PAGE_SIDE_RATIO
}

/// Classifies blocks of a single page. Results depend only on the box and page geometry.
#[derive(Debug, Clone, Copy)]
pub struct RegionClassifier {
    page: Rect,
    header_threshold: f32,
    img_threshold: f32,
}

impl RegionClassifier {
    pub fn new(page: Rect, config: &ExtractConfig) -> Self {
        Self {
            page,
            header_threshold: config.header_threshold,
            img_threshold: config.img_threshold,
        }
    }

    fn page_height(&self) -> f32 {
        self.page.height()
    }

    /// Text survives unless it starts in the header/footer band
    pub fn keeps_text(&self, bbox: &Rect) -> bool {
        !in_header_footer(bbox, self.page_height(), self.header_threshold)
    }

    /// Full-page images always survive; others are dropped near the bottom or in header/footer
    pub fn rejects_image(&self, bbox: &Rect) -> bool {
        if is_full_page(bbox, &self.page) {
            return false;
        }
        self.below_image_threshold(bbox)
            || in_header_footer(bbox, self.page_height(), self.header_threshold)
    }

    /// Whether a box starts below the bottom-of-page image threshold
    pub fn below_image_threshold(&self, bbox: &Rect) -> bool {
        bbox.y0 > self.page_height() * self.img_threshold
    }
}
