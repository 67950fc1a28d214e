//! Recursive discovery of Markdown documents.

use crate::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix a file name must end with to be processed.
pub const MARKDOWN_SUFFIX: &str = ".md";

/// True if the file name ends with `.md`.
pub fn is_markdown(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(MARKDOWN_SUFFIX))
        .unwrap_or(false)
}

/// Yields every non-directory entry under `root` whose name ends with `.md`,
/// sorted by file name within each directory.
///
/// Entries the walk cannot read come out as [`Error::Traversal`]; the walk
/// carries on with the remaining entries.
pub fn markdown_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, Error>> {
    let root_path = root.to_path_buf();
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if entry.file_type().is_dir() || !is_markdown(entry.path()) {
                    None
                } else {
                    Some(Ok(entry.into_path()))
                }
            }
            Err(source) => {
                let path = source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root_path.clone());
                Some(Err(Error::Traversal { path, source }))
            }
        })
}
