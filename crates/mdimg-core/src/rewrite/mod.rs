//! Fetch-and-rewrite engine.
//!
//! For one document: scan the image tags, decide per tag whether to download
//! it, save the bytes under a deterministic name, and splice the local path
//! back into the text. A failed tag is left exactly as it was; the others in
//! the same document still get rewritten.

mod splice;
mod state;

pub use splice::{splice, Replacement};
pub use state::{DocumentState, Plan};

use crate::config::MdimgConfig;
use crate::fetch::Fetch;
use crate::scanner::{self, ImageReference};
use crate::storage;
use crate::Error;
use std::io;
use std::path::{Path, PathBuf};

/// Inputs that stay fixed for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Substring an image URL must contain to be downloaded.
    pub host_marker: String,
    /// Extension used when the URL has none.
    pub default_extension: String,
    /// Directory downloaded images are written to.
    pub save_dir: PathBuf,
}

impl RewriteOptions {
    pub fn new(cfg: &MdimgConfig, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            host_marker: cfg.host_marker.clone(),
            default_extension: cfg.default_extension.clone(),
            save_dir: save_dir.into(),
        }
    }
}

/// A downloaded image that now lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub local_path: PathBuf,
    pub source_url: String,
}

/// Something worth telling the user about one document.
#[derive(Debug)]
pub enum Notice {
    /// The document has an image outside the marker host. Emitted at most once per document.
    NoEligibleImages,
    /// An image was downloaded and its tag rewritten.
    Saved(SavedImage),
    /// An eligible image could not be downloaded or saved; its tag is unchanged.
    Failed(Error),
}

/// Result of processing one document's content.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// New content; identical to the input when `modified` is false.
    pub content: String,
    /// True if at least one tag was rewritten.
    pub modified: bool,
    /// Notices in the order their references appear.
    pub notices: Vec<Notice>,
}

impl DocumentOutcome {
    pub fn saved_images(&self) -> impl Iterator<Item = &SavedImage> {
        self.notices.iter().filter_map(|n| match n {
            Notice::Saved(saved) => Some(saved),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &Error> {
        self.notices.iter().filter_map(|n| match n {
            Notice::Failed(err) => Some(err),
            _ => None,
        })
    }

    /// Whether the one-shot ineligible notice was emitted.
    pub fn noted_ineligible(&self) -> bool {
        self.notices
            .iter()
            .any(|n| matches!(n, Notice::NoEligibleImages))
    }
}

/// Rewrites documents using `F` to fetch image bytes.
pub struct Rewriter<F> {
    fetcher: F,
    options: RewriteOptions,
}

impl<F: Fetch> Rewriter<F> {
    pub fn new(fetcher: F, options: RewriteOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Processes the content of the document at `path`. Does not touch the
    /// document file itself; persisting `content` is up to the caller.
    pub fn process(&self, path: &Path, content: &str) -> DocumentOutcome {
        let references = scanner::scan(content);
        let mut state = DocumentState::default();
        let mut replacements = Vec::new();
        let mut notices = Vec::new();

        for reference in &references {
            let (plan, next) = state.plan(reference, path, &self.options);
            state = next;
            match plan {
                Plan::Skip { notify } => {
                    tracing::debug!(
                        url = %reference.original_url,
                        index = reference.sequence_index,
                        "image not on marker host, left as-is"
                    );
                    if notify {
                        notices.push(Notice::NoEligibleImages);
                    }
                }
                Plan::Download { destination } => match self.localize(reference, destination) {
                    Ok(saved) => {
                        replacements.push(Replacement {
                            span: reference.match_span.clone(),
                            text: scanner::render_tag(&saved.local_path.to_string_lossy()),
                        });
                        state = state.record_rewrite();
                        notices.push(Notice::Saved(saved));
                    }
                    Err(err) => {
                        tracing::warn!("{}", err);
                        notices.push(Notice::Failed(err));
                    }
                },
            }
        }

        let content = if state.modified {
            splice(content, &replacements)
        } else {
            content.to_string()
        };
        DocumentOutcome {
            content,
            modified: state.modified,
            notices,
        }
    }

    fn localize(
        &self,
        reference: &ImageReference,
        destination: PathBuf,
    ) -> Result<SavedImage, Error> {
        let url = &reference.original_url;
        if !scanner::fits_in_tag(&destination.to_string_lossy()) {
            return Err(Error::Write {
                path: destination,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path contains a quote or line break",
                ),
            });
        }
        let bytes = self.fetcher.fetch(url).map_err(|source| Error::Download {
            url: url.clone(),
            source,
        })?;
        storage::write_atomic(&destination, &bytes).map_err(|source| Error::Write {
            path: destination.clone(),
            source,
        })?;
        tracing::debug!(
            url = %url,
            path = %destination.display(),
            bytes = bytes.len(),
            "image saved"
        );
        Ok(SavedImage {
            local_path: destination,
            source_url: url.clone(),
        })
    }
}
