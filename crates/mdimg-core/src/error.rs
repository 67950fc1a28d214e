//! Error kinds reported by the batch: one variant per scope at which a failure is caught.

use crate::fetch::FetchError;
use std::path::PathBuf;

/// Failure while localizing images.
///
/// Only [`Error::Setup`] is fatal to a run; every other kind is reported at the
/// scope where it happened (document or reference) and processing moves on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The directory walk could not enumerate an entry.
    #[error("failed to traverse {}: {source}", .path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A document could not be read (permissions, invalid UTF-8).
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One image reference could not be fetched.
    #[error("failed to download image {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },

    /// A rewritten document or downloaded image could not be persisted.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing can be processed: no destination or no program location.
    #[error("{message}")]
    Setup {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl Error {
    pub(crate) fn setup(message: impl Into<String>, source: Option<std::io::Error>) -> Self {
        Error::Setup {
            message: message.into(),
            source,
        }
    }
}
