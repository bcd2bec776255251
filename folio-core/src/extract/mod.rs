//! The extraction engine: structured pages in, chaptered book out
//!
//! [`Chapterizer`] is the entry point. It plans chapter page ranges from the
//! source's table of contents, walks every page of each range through the
//! region, paragraph and image stages, and picks a cover from the result.

pub mod images;
pub mod naming;
pub mod page;
pub mod paragraph;
pub mod recovery;
pub mod region;
pub mod segment;

pub use images::{ImageAcceptor, ImageOutcome, PageContext, PageRegions, SeenImages};
pub use naming::{sanitize, select_cover, DEFAULT_MAX_LEN};
pub use page::{PageContentExtractor, PageStats};
pub use paragraph::ParagraphMerger;
pub use recovery::MissedImageRecovery;
pub use region::{in_header_footer, is_full_page, RegionClassifier};
pub use segment::{plan_chapters, ChapterPlan, ChapterSegmenter};

use crate::config::ExtractConfig;
use crate::source::DocumentSource;
use crate::types::{Book, Metadata};

/// Language recorded on every assembled book
pub const DEFAULT_LANGUAGE: &str = "en";

/// Assembles a [`Book`] from a [`DocumentSource`]
pub struct Chapterizer {
    config: ExtractConfig,
}

impl Chapterizer {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Build the book.
    ///
    /// `fallback_title` is used when the source metadata has no title,
    /// typically the input file stem. Failures inside pages are logged and
    /// skipped, so this always produces a book.
    pub fn build_book(&self, source: &dyn DocumentSource, fallback_title: &str) -> Book {
        let info = source.metadata();
        let title = info
            .get("title")
            .cloned()
            .unwrap_or_else(|| fallback_title.to_string());

        let mut metadata = Metadata::new(title.clone(), DEFAULT_LANGUAGE);
        if let Some(author) = info.get("author") {
            metadata = metadata.with_creator(author.clone());
        }

        let supplied_prefix = self.config.img_prefix.clone().unwrap_or(title);
        let prefix = sanitize(&supplied_prefix, DEFAULT_MAX_LEN);
        tracing::debug!("Using image prefix '{}'", prefix);

        let toc = source.toc();
        let chapters =
            ChapterSegmenter::new(source, &self.config, &prefix).segment(&toc, &supplied_prefix);

        let mut book = Book::with_metadata(metadata);
        book.cover = select_cover(&chapters);
        if book.cover.is_none() {
            tracing::info!("No cover image found in the first chapter");
        }
        book.chapters = chapters;
        book
    }
}

impl Default for Chapterizer {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}
