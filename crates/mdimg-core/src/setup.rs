//! Run setup: where documents are found and where images go.
//!
//! Everything here is fatal when it fails ([`Error::Setup`]); nothing can be
//! processed without a destination directory.

use crate::scanner;
use crate::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default destination relative to the home directory.
pub const DEFAULT_SAVE_SUBDIR: &str = "Pictures/markdown-images";

/// User interaction needed during setup, injectable for tests.
pub trait Prompt {
    /// Shows `message` and returns one line of input without the line ending.
    fn ask(&mut self, message: &str) -> io::Result<String>;

    /// Shows `message` and returns true only for a `y`/`Y` answer.
    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        let answer = self.ask(message)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }

    /// Shows `message` and blocks until the user acknowledges it.
    fn acknowledge(&mut self, message: &str) -> io::Result<()> {
        self.ask(message).map(drop)
    }
}

/// Outcome of making sure the destination exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDir {
    /// The directory exists (possibly just created).
    Ready(PathBuf),
    /// It did not exist and the user declined to create it.
    Declined(PathBuf),
}

/// `<home>/Pictures/markdown-images`.
pub fn default_save_dir_in(home: &Path) -> PathBuf {
    home.join(DEFAULT_SAVE_SUBDIR)
}

/// Default destination under the current user's home directory.
pub fn default_save_dir() -> Result<PathBuf, Error> {
    dirs::home_dir()
        .map(|home| default_save_dir_in(&home))
        .ok_or_else(|| Error::setup("could not determine home directory", None))
}

/// Directory containing the running executable; documents are searched from here.
pub fn program_dir() -> Result<PathBuf, Error> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::setup("could not determine program path", Some(e)))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::setup(format!("{} has no parent directory", exe.display()), None))
}

/// Asks for the destination; an empty answer selects `default`.
pub fn choose_save_dir<P: Prompt + ?Sized>(
    prompt: &mut P,
    default: &Path,
) -> Result<PathBuf, Error> {
    let message = format!(
        "Enter the image save directory (press Enter for default: {}):",
        default.display()
    );
    let answer = prompt
        .ask(&message)
        .map_err(|e| Error::setup("failed to read save directory", Some(e)))?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(default.to_path_buf())
    } else {
        Ok(PathBuf::from(answer))
    }
}

/// Makes sure `dir` exists, asking before creating it unless `assume_yes`.
/// A path that could not be written into an image tag is rejected outright.
pub fn ensure_save_dir<P: Prompt + ?Sized>(
    prompt: &mut P,
    dir: &Path,
    assume_yes: bool,
) -> Result<SaveDir, Error> {
    if !scanner::fits_in_tag(&dir.to_string_lossy()) {
        return Err(Error::setup(
            format!(
                "{} cannot be used: image paths may not contain quotes or line breaks",
                dir.display()
            ),
            None,
        ));
    }
    if dir.is_dir() {
        return Ok(SaveDir::Ready(dir.to_path_buf()));
    }
    if dir.exists() {
        return Err(Error::setup(
            format!("{} exists but is not a directory", dir.display()),
            None,
        ));
    }

    let create = assume_yes
        || prompt
            .confirm(&format!("Directory {} does not exist. Create it? (y/n):", dir.display()))
            .map_err(|e| Error::setup("failed to read confirmation", Some(e)))?;
    if !create {
        return Ok(SaveDir::Declined(dir.to_path_buf()));
    }

    fs::create_dir_all(dir).map_err(|e| {
        Error::setup(format!("failed to create directory {}", dir.display()), Some(e))
    })?;
    tracing::info!("created save directory {}", dir.display());
    Ok(SaveDir::Ready(dir.to_path_buf()))
}
