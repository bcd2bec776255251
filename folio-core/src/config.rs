//! Extraction settings threaded through every stage of the engine

use serde::{Deserialize, Serialize};

/// Default distance from the top and bottom page edges treated as header/footer
pub const DEFAULT_HEADER_THRESHOLD: f32 = 60.0;

/// Default fraction of the page height below which non-full-page images are dropped
pub const DEFAULT_IMG_THRESHOLD: f32 = 0.7;

/// How duplicate images are suppressed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Compare placement rectangles, scoped to the current page only
    #[default]
    #[serde(rename = "per_page_bbox")]
    PerPageBBox,

    /// Skip any image whose bytes were already emitted anywhere in the document
    DocumentWideHash,
}

/// Immutable extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractConfig {
    /// Header/footer band height in page units
    pub header_threshold: f32,

    /// Images starting below `page_height * img_threshold` are dropped
    pub img_threshold: f32,

    /// Prefix for generated image filenames; the book title is used when absent
    pub img_prefix: Option<String>,

    /// Duplicate image policy
    pub dedup: DedupStrategy,

    /// Extract chapters on the rayon pool
    pub parallel: bool,

    /// Emit per-block debug events
    pub debug: bool,

    /// Keep the bytes of position-rejected images for inspection
    #[serde(default)]
    pub keep_ignored: bool,
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self {
            header_threshold: DEFAULT_HEADER_THRESHOLD,
            img_threshold: DEFAULT_IMG_THRESHOLD,
            img_prefix: None,
            dedup: DedupStrategy::PerPageBBox,
            parallel: false,
            debug: false,
            keep_ignored: false,
        }
    }

    /// Set the header/footer threshold
    pub fn with_header_threshold(mut self, threshold: f32) -> Self {
        self.header_threshold = threshold;
        self
    }

    /// Set the bottom-of-page image threshold
    pub fn with_img_threshold(mut self, threshold: f32) -> Self {
        self.img_threshold = threshold;
        self
    }

    /// Set the image filename prefix
    pub fn with_img_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.img_prefix = Some(prefix.into());
        self
    }

    /// Set the dedup strategy
    pub fn with_dedup(mut self, dedup: DedupStrategy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Enable or disable parallel chapter extraction
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable per-block debug events
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Keep rejected images alongside each chapter
    pub fn with_keep_ignored(mut self, keep: bool) -> Self {
        self.keep_ignored = keep;
        self
    }

    /// Whether chapters may run concurrently.
    ///
    /// Document-wide hashing shares one seen-set across chapters, so it
    /// always runs sequentially.
    pub fn runs_parallel(&self) -> bool {
        self.parallel && self.dedup == DedupStrategy::PerPageBBox
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.header_threshold, 60.0);
        assert_eq!(config.img_threshold, 0.7);
        assert_eq!(config.dedup, DedupStrategy::PerPageBBox);
        assert!(config.img_prefix.is_none());
        assert!(!config.runs_parallel());
        assert!(!config.keep_ignored);
    }

    #[test]
    fn test_hash_dedup_disables_parallel() {
        let config = ExtractConfig::new()
            .with_parallel(true)
            .with_dedup(DedupStrategy::DocumentWideHash);
        assert!(!config.runs_parallel());
        assert!(config.with_dedup(DedupStrategy::PerPageBBox).runs_parallel());
    }

    #[test]
    fn test_config_serialization() {
        let config = ExtractConfig::new().with_img_prefix("vol1");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"per_page_bbox\""));
        let back: ExtractConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
