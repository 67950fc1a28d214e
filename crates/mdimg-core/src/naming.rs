//! Local filename derivation for downloaded images.
//!
//! Names are `{document stem}-{sequence index}{extension}`: unique within one
//! document, but two documents with the same stem (or a second run) reuse and
//! overwrite the same files.

use std::path::Path;

/// Extension (with leading dot) of the image URL's last path segment, ignoring
/// any query string. `None` if the segment has no extension.
///
/// # Examples
///
/// - `"http://x/y.png?w=1"` → `Some(".png")`
/// - `"https://host/noedgeai.com/pic"` → `None`
pub fn extension_from_url(url: &str) -> Option<&str> {
    let without_query = url.split('?').next().unwrap_or(url);
    let segment = without_query.rsplit('/').next().unwrap_or(without_query);
    let dot = segment.rfind('.')?;
    // A leading dot marks a hidden name, not an extension.
    if segment[..dot].chars().all(|c| c == '.') {
        return None;
    }
    Some(&segment[dot..])
}

/// Document filename without its own extension (`notes/a.md` → `a`).
pub fn document_base_name(document: &Path) -> String {
    document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Local filename for the `sequence_index`-th image of `document`.
pub fn image_filename(
    document: &Path,
    sequence_index: usize,
    url: &str,
    default_extension: &str,
) -> String {
    let ext = extension_from_url(url).unwrap_or(default_extension);
    format!("{}-{}{}", document_base_name(document), sequence_index, ext)
}
