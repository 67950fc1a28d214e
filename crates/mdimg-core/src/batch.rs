//! Batch driver: read each document, rewrite it, persist it if anything changed.
//!
//! Failures are reported per document (or per image) on the console sink and
//! never stop the remaining documents.

use crate::fetch::Fetch;
use crate::rewrite::{DocumentOutcome, Notice, Rewriter};
use crate::storage;
use crate::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// What happened to the document file itself.
#[derive(Debug)]
pub enum Persisted {
    /// The rewritten content replaced the file.
    Written,
    /// Nothing was rewritten; the file was not touched.
    Untouched,
    /// Content changed but could not be written; the file keeps its old content.
    Failed(Error),
}

/// Result of processing one document file.
#[derive(Debug)]
pub struct DocumentReport {
    pub outcome: DocumentOutcome,
    pub persisted: Persisted,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents that were read successfully.
    pub documents: usize,
    /// Documents written back with new content.
    pub rewritten: usize,
    /// Images downloaded and saved.
    pub images_saved: usize,
    /// Traversal, read, download and write failures.
    pub failures: usize,
}

impl BatchSummary {
    /// One-line human summary for the end of a run.
    pub fn describe(&self) -> String {
        format!(
            "{} document(s) processed, {} updated, {} image(s) saved, {} failure(s)",
            self.documents, self.rewritten, self.images_saved, self.failures
        )
    }
}

pub fn read_document(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces the document at `path` with `content` in one atomic step.
/// A symlinked `path` is resolved first, so the file it points to is rewritten
/// and the link itself stays in place.
pub fn persist_document(path: &Path, content: &str) -> Result<(), Error> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let target = fs::canonicalize(path).map_err(write_err)?;
    storage::write_atomic(&target, content.as_bytes()).map_err(write_err)
}

/// Reads, rewrites and (only if modified) persists one document.
/// `Err` means the document could not be read and nothing was attempted.
pub fn process_document<F: Fetch>(
    rewriter: &Rewriter<F>,
    path: &Path,
) -> Result<DocumentReport, Error> {
    let content = read_document(path)?;
    let outcome = rewriter.process(path, &content);
    let persisted = if outcome.modified {
        match persist_document(path, &outcome.content) {
            Ok(()) => Persisted::Written,
            Err(err) => Persisted::Failed(err),
        }
    } else {
        Persisted::Untouched
    };
    Ok(DocumentReport { outcome, persisted })
}

/// Processes every document yielded by `documents`, writing human-readable
/// status lines to `out`. Only a failure to write to `out` ends the run early.
pub fn run<F, I, W>(rewriter: &Rewriter<F>, documents: I, out: &mut W) -> io::Result<BatchSummary>
where
    F: Fetch,
    I: IntoIterator<Item = Result<PathBuf, Error>>,
    W: Write + ?Sized,
{
    let mut summary = BatchSummary::default();
    for item in documents {
        let path = match item {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("{}", err);
                writeln!(out, "{}", err)?;
                summary.failures += 1;
                continue;
            }
        };

        writeln!(out, "Processing file: {}", path.display())?;
        let report = match process_document(rewriter, &path) {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!("{}", err);
                writeln!(out, "{}", err)?;
                summary.failures += 1;
                continue;
            }
        };
        summary.documents += 1;
        report_document(rewriter, &path, &report, &mut summary, out)?;
    }

    tracing::info!(
        documents = summary.documents,
        rewritten = summary.rewritten,
        images_saved = summary.images_saved,
        failures = summary.failures,
        "batch finished"
    );
    Ok(summary)
}

fn report_document<F, W>(
    rewriter: &Rewriter<F>,
    path: &Path,
    report: &DocumentReport,
    summary: &mut BatchSummary,
    out: &mut W,
) -> io::Result<()>
where
    F: Fetch,
    W: Write + ?Sized,
{
    let outcome = &report.outcome;
    for notice in &outcome.notices {
        match notice {
            Notice::NoEligibleImages => writeln!(
                out,
                "Images are not hosted on {}; file needs no update",
                rewriter.options().host_marker
            )?,
            Notice::Saved(saved) => {
                summary.images_saved += 1;
                writeln!(out, "  saved {}", saved.local_path.display())?;
            }
            Notice::Failed(err) => {
                summary.failures += 1;
                writeln!(out, "  {}", err)?;
            }
        }
    }

    match &report.persisted {
        Persisted::Written => {
            summary.rewritten += 1;
            tracing::info!("rewrote {}", path.display());
            writeln!(out, "File updated")?;
        }
        Persisted::Failed(err) => {
            summary.failures += 1;
            tracing::warn!("{}", err);
            writeln!(out, "{}", err)?;
        }
        Persisted::Untouched => {
            tracing::debug!("{} unchanged", path.display());
            if !outcome.noted_ineligible() {
                writeln!(out, "File needs no update")?;
            }
        }
    }
    Ok(())
}
