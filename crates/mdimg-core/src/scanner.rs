//! Locates `<img src="URL"/>` references in document text.
//!
//! Only the exact self-closing shape with a single `src` attribute is
//! recognized. Everything else in the document is opaque to the scanner.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// The URL cannot contain a quote or line break, so tags with extra
/// attributes or split across lines never match.
static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img src="([^"\r\n]*)"/>"#).unwrap());

/// One occurrence of the image tag inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Attribute value, verbatim.
    pub original_url: String,
    /// Byte range of the whole tag in the scanned content.
    pub match_span: Range<usize>,
    /// 1-based position among all matches in the document.
    pub sequence_index: usize,
}

/// Returns every image reference in `content`, left to right.
pub fn scan(content: &str) -> Vec<ImageReference> {
    IMG_TAG
        .captures_iter(content)
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let url = caps.get(1)?;
            Some(ImageReference {
                original_url: url.as_str().to_string(),
                match_span: whole.range(),
                sequence_index: i + 1,
            })
        })
        .collect()
}

/// True when `value` can sit between the quotes of a rendered tag and still
/// be scanned back as one reference.
pub fn fits_in_tag(value: &str) -> bool {
    !value.contains(['"', '\r', '\n'])
}

/// Renders a tag of the recognized shape with `src` set to `value`.
/// `value` must satisfy [`fits_in_tag`].
pub fn render_tag(value: &str) -> String {
    format!(r#"<img src="{}"/>"#, value)
}
