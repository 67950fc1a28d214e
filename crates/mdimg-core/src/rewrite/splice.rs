//! Single-pass reconstruction of a document from original spans and replacements.

use std::ops::Range;

/// New text for one byte range of the original content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub span: Range<usize>,
    pub text: String,
}

/// Copies `original` left to right, substituting each replacement's span.
///
/// `replacements` must be sorted by start and non-overlapping (scan order
/// guarantees this). Replaced text is never looked at again.
pub fn splice(original: &str, replacements: &[Replacement]) -> String {
    let added: usize = replacements.iter().map(|r| r.text.len()).sum();
    let mut out = String::with_capacity(original.len() + added);
    let mut cursor = 0;
    for r in replacements {
        debug_assert!(r.span.start >= cursor, "replacements out of order");
        out.push_str(&original[cursor..r.span.start]);
        out.push_str(&r.text);
        cursor = r.span.end;
    }
    out.push_str(&original[cursor..]);
    out
}
