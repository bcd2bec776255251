//! Merging text lines into paragraphs with inline font styling

use crate::types::{Fragment, Inline, Line, Span};

/// Merges the lines of one text block into paragraph fragments
pub struct ParagraphMerger;

impl ParagraphMerger {
    /// Build paragraphs from the ordered lines of a text block.
    ///
    /// A line is held open when the next line starts with a lowercase
    /// letter, so sentences wrapped across lines end up in one paragraph.
    /// Always returns at least one paragraph.
    pub fn merge(lines: &[Line]) -> Vec<Fragment> {
        let mut paragraphs = Vec::new();
        let mut buffer: Vec<Inline> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            buffer.extend(line.spans.iter().map(span_to_inline));

            if lines.get(i + 1).is_some_and(continues_sentence) {
                buffer.push(Inline::text(" "));
                continue;
            }

            let content = std::mem::take(&mut buffer);
            if has_visible_text(&content) {
                paragraphs.push(Fragment::paragraph(content));
            }
        }

        // An empty block still occupies a paragraph downstream
        if paragraphs.is_empty() {
            paragraphs.push(Fragment::paragraph(vec![Inline::text(" ")]));
        }

        paragraphs
    }
}

/// Whether a line continues the previous one
fn continues_sentence(line: &Line) -> bool {
    line.spans
        .first()
        .and_then(|span| span.text.trim().chars().next())
        .is_some_and(char::is_lowercase)
}

fn has_visible_text(inlines: &[Inline]) -> bool {
    inlines.iter().any(|i| !i.plain_text().trim().is_empty())
}

/// Style a span from its font name
pub fn span_to_inline(span: &Span) -> Inline {
    let font = span.font.to_lowercase();
    let text = Inline::text(span.text.clone());
    match (font.contains("bold"), font.contains("italic")) {
        (true, true) => Inline::Bold(vec![Inline::Italic(vec![text])]),
        (false, true) => Inline::Italic(vec![text]),
        (true, false) => Inline::Bold(vec![text]),
        (false, false) => text,
    }
}
