//! Filesystem-safe image names and cover selection

use crate::types::{Chapter, Cover};
use regex::Regex;
use std::sync::OnceLock;

/// Default length limit for sanitized names
pub const DEFAULT_MAX_LEN: usize = 40;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t'];

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Make `name` safe to use as a filename on every platform
pub fn sanitize(name: &str, max_len: usize) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let collapsed = whitespace_run().replace_all(replaced.trim(), "_");
    collapsed.chars().take(max_len).collect()
}

/// Name of an image found as a page block
pub fn image_filename(prefix: &str, page_number: usize, index: usize) -> String {
    format!("{}-page_{}-image_{}.png", prefix, page_number, index)
}

/// Name of an image recovered from the page's reference list
pub fn full_image_filename(prefix: &str, page_number: usize, index: usize) -> String {
    format!("{}-page_{}-full_{}.png", prefix, page_number, index)
}

/// Name of an image dropped by the position filters
pub fn ignored_image_filename(page_number: usize, index: usize) -> String {
    format!("ignored_page_{}-image_{}.png", page_number, index)
}

/// First image of the first chapter, if it has any
pub fn select_cover(chapters: &[Chapter]) -> Option<Cover> {
    let (filename, data) = chapters.first()?.images.first()?;
    Some(Cover {
        filename: filename.clone(),
        data: data.clone(),
    })
}
