//! Per-document evaluation state.

use super::RewriteOptions;
use crate::naming;
use crate::scanner::ImageReference;
use std::path::{Path, PathBuf};

/// What to do with one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Leave the tag alone. `notify` is set for the first ineligible tag of the document.
    Skip { notify: bool },
    /// Fetch the URL and save it at `destination`.
    Download { destination: PathBuf },
}

/// State threaded through the references of one document, in scan order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentState {
    /// At least one tag has been rewritten.
    pub modified: bool,
    /// The ineligible notice was already emitted for this document.
    pub ineligible_noticed: bool,
}

impl DocumentState {
    /// Decides the plan for `reference` given the state so far. Pure: no I/O.
    pub fn plan(
        self,
        reference: &ImageReference,
        document: &Path,
        options: &RewriteOptions,
    ) -> (Plan, DocumentState) {
        if !reference.original_url.contains(options.host_marker.as_str()) {
            let plan = Plan::Skip {
                notify: !self.ineligible_noticed,
            };
            let next = DocumentState {
                ineligible_noticed: true,
                ..self
            };
            return (plan, next);
        }

        let filename = naming::image_filename(
            document,
            reference.sequence_index,
            &reference.original_url,
            &options.default_extension,
        );
        let plan = Plan::Download {
            destination: options.save_dir.join(filename),
        };
        (plan, self)
    }

    /// State after a tag was successfully replaced.
    pub fn record_rewrite(self) -> DocumentState {
        DocumentState {
            modified: true,
            ..self
        }
    }
}
