//! Chapter content fragments and their XHTML rendering

use serde::{Deserialize, Serialize};

/// A unit of chapter content, appended in document order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    /// Paragraph of styled text
    Paragraph(Vec<Inline>),

    /// Reference to an image stored in the chapter's image map
    Image { filename: String, alt: String },
}

/// Inline content element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text
    Text(String),

    /// Bold/strong text
    Bold(Vec<Inline>),

    /// Italic/emphasized text
    Italic(Vec<Inline>),
}

impl Inline {
    /// Create a plain text inline
    pub fn text(s: impl Into<String>) -> Self {
        Inline::Text(s.into())
    }

    /// Plain text with all styling removed
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text(s) => s.clone(),
            Inline::Bold(children) | Inline::Italic(children) => {
                children.iter().map(Inline::plain_text).collect()
            }
        }
    }

    /// Render as XHTML
    pub fn to_xhtml(&self) -> String {
        match self {
            Inline::Text(s) => escape_html(s),
            Inline::Bold(children) => format!("<strong>{}</strong>", inlines_to_xhtml(children)),
            Inline::Italic(children) => format!("<em>{}</em>", inlines_to_xhtml(children)),
        }
    }
}

impl Fragment {
    /// Create a paragraph from inline elements
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Fragment::Paragraph(content)
    }

    /// Create an image reference
    pub fn image(filename: impl Into<String>, alt: impl Into<String>) -> Self {
        Fragment::Image {
            filename: filename.into(),
            alt: alt.into(),
        }
    }

    /// Render as XHTML, one fragment per line
    pub fn to_xhtml(&self) -> String {
        match self {
            Fragment::Paragraph(inlines) => format!("<p>{}</p>\n", inlines_to_xhtml(inlines)),
            Fragment::Image { filename, alt } => format!(
                "<img src=\"images/{}\" alt=\"{}\"/>\n",
                escape_html(filename),
                escape_html(alt)
            ),
        }
    }
}

/// Render a sequence of inlines
pub fn inlines_to_xhtml(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::to_xhtml).collect()
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
