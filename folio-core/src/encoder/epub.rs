//! EPUB encoder implementation

use crate::error::ConversionError;
use crate::types::{escape_html, Book, Chapter, Fragment, Inline};
use std::borrow::Cow;
use std::io::Write;

/// Title of the chapter written when a book has none
pub const PLACEHOLDER_TITLE: &str = "Empty";

/// Encoder for EPUB 3 format
pub struct EpubEncoder;

impl EpubEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Generate XHTML document for a chapter
    fn chapter_to_xhtml(&self, chapter: &Chapter) -> String {
        let title = escape_html(&chapter.title);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
    <title>{}</title>
    <meta charset="UTF-8"/>
</head>
<body>
<h1>{}</h1>
{}
</body>
</html>"#,
            title,
            title,
            chapter.html()
        )
    }
}

impl Default for EpubEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// MIME type sniffed from image bytes, PNG when unknown
fn image_mime(data: &[u8]) -> &'static str {
    image::guess_format(data)
        .map(|f| f.to_mime_type())
        .unwrap_or("image/png")
}

/// Chapters to write; a spine needs at least one
fn chapters_or_placeholder(book: &Book) -> Cow<'_, [Chapter]> {
    if !book.chapters.is_empty() {
        return Cow::Borrowed(&book.chapters);
    }
    tracing::warn!("'{}' has no chapters, writing a placeholder", book.title());
    let mut placeholder = Chapter::new(PLACEHOLDER_TITLE);
    placeholder.push(Fragment::paragraph(vec![Inline::text(" ")]));
    Cow::Owned(vec![placeholder])
}

impl super::Encoder for EpubEncoder {
    fn encode(&self, book: &Book, writer: &mut dyn Write) -> Result<(), ConversionError> {
        use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ZipLibrary};

        let mut builder = EpubBuilder::new(ZipLibrary::new().map_err(|e| {
            ConversionError::EncodingFailed(format!("Failed to create zip: {}", e))
        })?)
        .map_err(|e| {
            ConversionError::EncodingFailed(format!("Failed to create EPUB builder: {}", e))
        })?;
        builder.epub_version(EpubVersion::V30);

        // Set metadata
        builder
            .metadata("title", &book.metadata.title)
            .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;

        builder
            .metadata("author", book.metadata.author())
            .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;

        builder
            .metadata("lang", &book.metadata.language)
            .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;

        if let Some(cover) = &book.cover {
            builder
                .add_cover_image(
                    format!("cover-{}", cover.filename),
                    cover.data.as_slice(),
                    image_mime(&cover.data),
                )
                .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;
        }

        let chapters = chapters_or_placeholder(book);

        // Add images
        for (filename, data) in chapters.iter().flat_map(|c| c.images.iter()) {
            builder
                .add_resource(format!("images/{}", filename), data.as_slice(), image_mime(data))
                .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;
        }

        // Add chapters
        for (i, chapter) in chapters.iter().enumerate() {
            let xhtml = self.chapter_to_xhtml(chapter);
            let filename = format!("chapter_{}.xhtml", i + 1);

            builder
                .add_content(
                    EpubContent::new(&filename, xhtml.as_bytes())
                        .title(&chapter.title)
                        .level(chapter.level as i32)
                        .reftype(epub_builder::ReferenceType::Text),
                )
                .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;
        }

        // Generate EPUB
        builder
            .generate(writer)
            .map_err(|e| ConversionError::EncodingFailed(e.to_string()))?;

        Ok(())
    }

    fn format_name(&self) -> &str {
        "EPUB"
    }

    fn file_extension(&self) -> &str {
        "epub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_to_xhtml() {
        let encoder = EpubEncoder::new();
        let mut chapter = Chapter::new("Tom & Jerry");
        chapter.push(Fragment::paragraph(vec![Inline::text("Hello")]));

        let xhtml = encoder.chapter_to_xhtml(&chapter);
        assert!(xhtml.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(xhtml.contains("<p>Hello</p>"));
    }

    #[test]
    fn test_placeholder_chapter() {
        let book = Book::new("Nothing", "en");
        let chapters = chapters_or_placeholder(&book);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(b"\x89PNG\r\n\x1a\n...."), "image/png");
        assert_eq!(image_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), "image/jpeg");
        assert_eq!(image_mime(&[1, 2, 3]), "image/png");
    }
}
