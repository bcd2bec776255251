//! Folio Core Library
//!
//! Turns structured page content (positioned text runs and images) into a
//! chaptered book. Headers and footers are dropped by position, wrapped
//! lines are merged into paragraphs, images are filtered, named and
//! recovered when the source's block and reference listings disagree, and
//! the table of contents decides where chapters start. The result can be
//! packaged as EPUB through [`encoder`].

pub mod config;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod source;
pub mod types;

pub use config::{DedupStrategy, ExtractConfig};
pub use error::{ConversionError, FolioError, Result, SourceError};
pub use extract::Chapterizer;
pub use source::{loader_for_extension, DocumentSource, JsonSource, SourceLoader};
pub use types::{
    Block, Book, Chapter, Cover, Fragment, ImagePayload, Inline, Line, Metadata, Page, RawImage,
    Rect, Span, TocEntry,
};
