use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Only image URLs containing this substring are downloaded.
pub const DEFAULT_HOST_MARKER: &str = "noedgeai.com";

/// Per-request timeout for an image GET.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Extension used when the image URL path has none.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Global configuration loaded from `~/.config/mdimg/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdimgConfig {
    /// Substring an image URL must contain to be localized.
    pub host_marker: String,
    /// Timeout in seconds for each image download (connect + transfer).
    pub timeout_secs: u64,
    /// Extension (with leading dot) for images whose URL has no extension.
    pub default_extension: String,
    /// Destination offered at the prompt instead of `~/Pictures/markdown-images`.
    pub save_dir: Option<PathBuf>,
}

impl Default for MdimgConfig {
    fn default() -> Self {
        Self {
            host_marker: DEFAULT_HOST_MARKER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_extension: DEFAULT_EXTENSION.to_string(),
            save_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdimg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdimgConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<MdimgConfig> {
    if !path.exists() {
        let default_cfg = MdimgConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: MdimgConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
