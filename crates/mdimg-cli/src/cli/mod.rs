//! CLI for mdimg.

mod prompt;
mod run;

use anyhow::Result;
use clap::Parser;
use mdimg_core::config::{self, MdimgConfig};
use std::io;
use std::path::PathBuf;

pub use prompt::StdioPrompt;
pub use run::run_localize;

/// Download images referenced from Markdown files and point the tags at the local copies.
///
/// With no options the destination is asked for interactively and the program
/// waits for Enter before exiting.
#[derive(Debug, Parser)]
#[command(name = "mdimg")]
#[command(about = "Localize remote <img> references in Markdown files", long_about = None)]
pub struct Cli {
    /// Directory searched recursively for .md files (default: the directory containing this program).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory to save images to; skips the destination prompt.
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Create a missing save directory without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Exit without waiting for Enter.
    #[arg(long)]
    pub no_wait: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init().unwrap_or_else(|e| {
            tracing::warn!("could not load config, using defaults: {:#}", e);
            MdimgConfig::default()
        });
        tracing::debug!("loaded config: {:?}", cfg);

        let mut prompt = StdioPrompt::stdio();
        run_localize(&cli, &cfg, &mut prompt, &mut io::stdout())
    }
}
