//! Core types: structured page input and assembled book output

mod book;
mod chapter;
mod content;
mod geometry;
mod metadata;
mod page;
mod pixmap;
mod toc;

pub use book::{Book, Cover};
pub use chapter::Chapter;
pub use content::{escape_html, inlines_to_xhtml, Fragment, Inline};
pub use geometry::{Rect, RECT_EPSILON};
pub use metadata::{Metadata, UNKNOWN_AUTHOR};
pub use page::{Block, ImagePayload, Line, Page, Span};
pub use pixmap::RawImage;
pub use toc::TocEntry;
