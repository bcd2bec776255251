//! Splitting a document into chapters along its table of contents

use super::images::SeenImages;
use super::page::PageContentExtractor;
use crate::config::ExtractConfig;
use crate::source::DocumentSource;
use crate::types::{Chapter, TocEntry};
use rayon::prelude::*;
use std::ops::Range;

/// Title of the chapter synthesized for content before the first TOC entry
pub const UNTITLED_CHAPTER: &str = "No title";

/// A planned chapter: title plus zero-based, half-open page range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPlan {
    pub title: String,
    pub level: u32,
    pub pages: Range<usize>,
}

/// Turn a TOC into contiguous, ordered page ranges covering the document.
///
/// Entries with blank titles are dropped and the rest are stable-sorted by
/// start page, so entries sharing a page keep their source order. Without
/// usable entries the whole document becomes one chapter named `fallback_title`.
pub fn plan_chapters(
    toc: &[TocEntry],
    page_count: usize,
    fallback_title: &str,
) -> Vec<ChapterPlan> {
    let last_start = page_count as i64 + 1;
    let mut entries: Vec<(i64, &TocEntry)> = toc
        .iter()
        .filter(|e| !e.title.trim().is_empty())
        .map(|e| (e.start_page.clamp(1, last_start), e))
        .collect();

    if entries.is_empty() {
        return vec![ChapterPlan {
            title: fallback_title.to_string(),
            level: 1,
            pages: 0..page_count,
        }];
    }

    // Vec::sort_by_key is stable
    entries.sort_by_key(|(start, _)| *start);

    let mut plans: Vec<ChapterPlan> = Vec::with_capacity(entries.len() + 1);
    if entries[0].0 > 1 {
        plans.push(ChapterPlan {
            title: UNTITLED_CHAPTER.to_string(),
            level: 1,
            pages: 0..0,
        });
    }
    plans.extend(entries.iter().map(|(start, entry)| {
        let start = (*start - 1) as usize;
        ChapterPlan {
            title: entry.title.trim().to_string(),
            level: entry.level.max(1),
            pages: start..start,
        }
    }));

    // Each chapter ends where the next one starts
    let mut end = page_count;
    for plan in plans.iter_mut().rev() {
        plan.pages.end = end;
        end = plan.pages.start;
    }

    plans
}

/// Runs page extraction for every planned chapter
pub struct ChapterSegmenter<'a> {
    source: &'a dyn DocumentSource,
    config: &'a ExtractConfig,
    extractor: PageContentExtractor<'a>,
}

impl<'a> ChapterSegmenter<'a> {
    pub fn new(source: &'a dyn DocumentSource, config: &'a ExtractConfig, prefix: &'a str) -> Self {
        Self {
            source,
            config,
            extractor: PageContentExtractor::new(source, config, prefix),
        }
    }

    /// Extract all chapters in TOC order
    pub fn segment(&self, toc: &[TocEntry], fallback_title: &str) -> Vec<Chapter> {
        let plans = plan_chapters(toc, self.source.page_count(), fallback_title);
        tracing::debug!("Planned {} chapters", plans.len());

        if self.config.runs_parallel() {
            // collect() keeps the input order
            plans
                .par_iter()
                .map(|plan| self.extract(plan, &mut SeenImages::new()))
                .collect()
        } else {
            let mut seen = SeenImages::new();
            plans.iter().map(|plan| self.extract(plan, &mut seen)).collect()
        }
    }

    fn extract(&self, plan: &ChapterPlan, seen: &mut SeenImages) -> Chapter {
        tracing::info!(
            "Chapter '{}': pages {}..{}",
            plan.title,
            plan.pages.start + 1,
            plan.pages.end
        );
        let mut chapter = Chapter::new(plan.title.clone()).with_level(plan.level);
        self.extractor.extract_range(plan.pages.clone(), &mut chapter, seen);
        chapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(plans: &[ChapterPlan]) -> Vec<(&str, Range<usize>)> {
        plans.iter().map(|p| (p.title.as_str(), p.pages.clone())).collect()
    }

    #[test]
    fn test_empty_toc_is_one_chapter() {
        let plans = plan_chapters(&[], 12, "My Book");
        assert_eq!(ranges(&plans), vec![("My Book", 0..12)]);
    }

    #[test]
    fn test_ranges_follow_toc() {
        let toc = vec![
            TocEntry::new(1, "One", 1),
            TocEntry::new(1, "Two", 4),
            TocEntry::new(1, "Three", 9),
        ];
        let plans = plan_chapters(&toc, 10, "x");
        assert_eq!(ranges(&plans), vec![("One", 0..3), ("Two", 3..8), ("Three", 8..10)]);
    }

    #[test]
    fn test_leading_untitled_chapter() {
        let toc = vec![TocEntry::new(1, "Chapter 1", 3)];
        let plans = plan_chapters(&toc, 5, "x");
        assert_eq!(ranges(&plans), vec![("No title", 0..2), ("Chapter 1", 2..5)]);
    }

    #[test]
    fn test_duplicate_start_pages_keep_source_order() {
        let toc = vec![
            TocEntry::new(1, "Part", 1),
            TocEntry::new(2, "Subtitle", 1),
            TocEntry::new(1, "Chapter", 5),
        ];
        let plans = plan_chapters(&toc, 8, "x");
        assert_eq!(
            ranges(&plans),
            vec![("Part", 0..0), ("Subtitle", 0..4), ("Chapter", 4..8)]
        );
        assert_eq!(plans[1].level, 2);
    }

    #[test]
    fn test_unsorted_toc_and_blank_titles() {
        let toc = vec![
            TocEntry::new(1, "Later", 6),
            TocEntry::new(1, "   ", 2),
            TocEntry::new(1, "Earlier", 1),
        ];
        let plans = plan_chapters(&toc, 8, "x");
        assert_eq!(ranges(&plans), vec![("Earlier", 0..5), ("Later", 5..8)]);
    }

    #[test]
    fn test_only_blank_titles_fall_back() {
        let toc = vec![TocEntry::new(1, "", 1)];
        assert_eq!(ranges(&plan_chapters(&toc, 3, "Fallback")), vec![("Fallback", 0..3)]);
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        let toc = vec![
            TocEntry::new(1, "Bad", -1),
            TocEntry::new(1, "Beyond", 40),
        ];
        let plans = plan_chapters(&toc, 4, "x");
        assert_eq!(ranges(&plans), vec![("Bad", 0..4), ("Beyond", 4..4)]);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let toc: Vec<TocEntry> = [7, 2, 2, 15, 3]
            .iter()
            .enumerate()
            .map(|(i, p)| TocEntry::new(1, format!("c{}", i), *p))
            .collect();
        let plans = plan_chapters(&toc, 20, "x");
        assert_eq!(plans.first().unwrap().pages.start, 0);
        assert_eq!(plans.last().unwrap().pages.end, 20);
        for pair in plans.windows(2) {
            assert_eq!(pair[0].pages.end, pair[1].pages.start);
        }
    }
}
