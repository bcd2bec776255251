//! EPUB packaging tests

use folio_core::encoder::{encoder_for_format, Encoder, EpubEncoder};
use folio_core::{Book, Chapter, Chapterizer, ExtractConfig, Fragment, Inline, JsonSource};
use serde_json::json;
use std::io::{Cursor, Read};

/// One red RGB pixel, base64 encoded
const RED_PIXEL: &str = "/wAA";

fn encode(book: &Book) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    let mut output = Vec::new();
    EpubEncoder::new().encode(book, &mut output).unwrap();
    zip::ZipArchive::new(Cursor::new(output)).expect("EPUB should be a valid zip")
}

fn entry_names(archive: &zip::ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
    archive.file_names().map(String::from).collect()
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, suffix: &str) -> String {
    let name = entry_names(archive)
        .into_iter()
        .find(|n| n.ends_with(suffix))
        .unwrap_or_else(|| panic!("no entry ending in {}", suffix));
    let mut content = String::new();
    archive
        .by_name(&name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

#[test]
fn test_extracted_book_packages_images_and_chapters() {
    let doc = json!({
        "metadata": {"title": "Vol 1", "author": "A. Writer"},
        "toc": [[1, "One", 1], [1, "Two", 2]],
        "pages": [
            {"width": 600.0, "height": 800.0, "blocks": [
                {"type": 0, "bbox": [50, 100, 550, 150],
                 "lines": [{"spans": [{"text": "First.", "font": "Serif"}]}]},
                {"type": 1, "bbox": [100, 200, 500, 400], "image": RED_PIXEL}
            ]},
            {"width": 600.0, "height": 800.0, "blocks": [
                {"type": 0, "bbox": [50, 100, 550, 150],
                 "lines": [{"spans": [{"text": "Second.", "font": "Serif"}]}]}
            ]}
        ]
    });
    let source = JsonSource::from_value(doc).unwrap();
    let book = Chapterizer::default().build_book(&source, "fallback");
    assert_eq!(book.chapters.len(), 2);

    let mut archive = encode(&book);
    let names = entry_names(&archive);
    assert!(names.iter().any(|n| n == "mimetype"));
    assert!(names.iter().any(|n| n.ends_with("images/Vol_1-page_1-image_1.png")));
    assert!(names.iter().any(|n| n.ends_with("cover-Vol_1-page_1-image_1.png")));

    let first = read_entry(&mut archive, "chapter_1.xhtml");
    assert!(first.contains("<h1>One</h1>"));
    assert!(first.contains(r#"<img src="images/Vol_1-page_1-image_1.png" alt="Image"/>"#));

    let second = read_entry(&mut archive, "chapter_2.xhtml");
    assert!(second.contains("<p>Second.</p>"));

    let opf = read_entry(&mut archive, ".opf");
    assert!(opf.contains("Vol 1"));
    assert!(opf.contains("A. Writer"));
}

#[test]
fn test_book_without_images_or_cover() {
    let mut book = Book::new("Plain", "en");
    let mut chapter = Chapter::new("Only");
    chapter.push(Fragment::paragraph(vec![
        Inline::text("Some "),
        Inline::Bold(vec![Inline::text("bold")]),
    ]));
    book.add_chapter(chapter);

    let mut archive = encode(&book);
    assert!(!entry_names(&archive).iter().any(|n| n.contains("images/")));
    let xhtml = read_entry(&mut archive, "chapter_1.xhtml");
    assert!(xhtml.contains("<p>Some <strong>bold</strong></p>"));
}

#[test]
fn test_empty_book_gets_placeholder_chapter() {
    let book = Book::new("Nothing", "en");
    let mut archive = encode(&book);
    let xhtml = read_entry(&mut archive, "chapter_1.xhtml");
    assert!(xhtml.contains("<h1>Empty</h1>"));
}

#[test]
fn test_encoder_registry() {
    let encoder = encoder_for_format("EPUB").unwrap();
    assert_eq!(encoder.file_extension(), "epub");
    assert_eq!(encoder.format_name(), "EPUB");
    assert!(encoder_for_format("pdf").is_none());
}
