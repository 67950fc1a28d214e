//! The localize run: setup, batch over the document tree, final acknowledgment.

use anyhow::Result;
use mdimg_core::batch;
use mdimg_core::config::MdimgConfig;
use mdimg_core::discover;
use mdimg_core::fetch::CurlFetcher;
use mdimg_core::rewrite::{RewriteOptions, Rewriter};
use mdimg_core::setup::{self, Prompt, SaveDir};
use mdimg_core::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use super::Cli;

const EXIT_MESSAGE: &str = "Press Enter to exit...";

/// Runs one batch. Declining to create the save directory ends the run
/// normally; a setup failure is shown on `out` and returned after the user
/// acknowledges it.
pub fn run_localize<P, W>(cli: &Cli, cfg: &MdimgConfig, prompt: &mut P, out: &mut W) -> Result<()>
where
    P: Prompt + ?Sized,
    W: Write + ?Sized,
{
    let (root, save_dir) = match prepare(cli, cfg, prompt) {
        Ok(Some(dirs)) => dirs,
        Ok(None) => {
            writeln!(out, "Exiting")?;
            wait_for_exit(cli, prompt);
            return Ok(());
        }
        Err(err) => {
            writeln!(out, "{}", err)?;
            wait_for_exit(cli, prompt);
            return Err(err.into());
        }
    };

    let fetcher = CurlFetcher::new(Duration::from_secs(cfg.timeout_secs));
    tracing::info!(
        root = %root.display(),
        save_dir = %save_dir.display(),
        timeout_secs = fetcher.timeout().as_secs(),
        "starting run"
    );
    let rewriter = Rewriter::new(fetcher, RewriteOptions::new(cfg, save_dir));
    let summary = batch::run(&rewriter, discover::markdown_files(&root), out)?;

    writeln!(out)?;
    writeln!(out, "Done. {}", summary.describe())?;
    wait_for_exit(cli, prompt);
    Ok(())
}

/// Resolves the document root and a ready save directory. `None` means the
/// user declined to create the directory.
fn prepare<P: Prompt + ?Sized>(
    cli: &Cli,
    cfg: &MdimgConfig,
    prompt: &mut P,
) -> Result<Option<(PathBuf, PathBuf)>, Error> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => setup::program_dir()?,
    };

    let chosen = match &cli.save_dir {
        Some(dir) => dir.clone(),
        None => {
            let default = match &cfg.save_dir {
                Some(dir) => dir.clone(),
                None => setup::default_save_dir()?,
            };
            setup::choose_save_dir(prompt, &default)?
        }
    };

    match setup::ensure_save_dir(prompt, &chosen, cli.yes)? {
        SaveDir::Ready(dir) => Ok(Some((root, dir))),
        SaveDir::Declined(dir) => {
            tracing::info!("user declined to create {}", dir.display());
            Ok(None)
        }
    }
}

fn wait_for_exit<P: Prompt + ?Sized>(cli: &Cli, prompt: &mut P) {
    if !cli.no_wait {
        let _ = prompt.acknowledge(EXIT_MESSAGE);
    }
}
