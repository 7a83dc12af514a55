//! Document rendering.
//!
//! The render mode is chosen from the file extension alone. Plain text is
//! served verbatim; markdown is converted to an HTML fragment that the
//! server embeds in the page layout. Anything else has no render mode.

use std::path::Path;

use pulldown_cmark::{Options, Parser, html};

/// How a document is turned into a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `.txt`: served byte-for-byte as `text/plain`.
    PlainText,
    /// `.md`: converted to HTML and wrapped in the layout.
    Markdown,
    /// Any other extension, or none.
    Unsupported,
}

impl RenderMode {
    /// Pick the render mode for a document name. Extensions match
    /// case-insensitively.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("txt") => Self::PlainText,
            Some("md") => Self::Markdown,
            _ => Self::Unsupported,
        }
    }
}

/// A rendered document, ready to be turned into a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The raw bytes, to be sent as `text/plain`.
    PlainText(Vec<u8>),
    /// An HTML fragment, to be embedded in the page layout.
    Html(String),
}

/// Render `content` according to the render mode of `name`.
///
/// Returns `None` when the extension has no render mode.
#[must_use]
pub fn render(name: &str, content: Vec<u8>) -> Option<Rendered> {
    match RenderMode::for_name(name) {
        RenderMode::PlainText => Some(Rendered::PlainText(content)),
        RenderMode::Markdown => {
            let source = String::from_utf8_lossy(&content);
            Some(Rendered::Html(markdown_to_html(&source)))
        }
        RenderMode::Unsupported => None,
    }
}

/// Convert `CommonMark` source to HTML. Inline and block HTML in the source
/// passes through unchanged.
#[must_use]
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::empty());
    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, parser);
    out
}
