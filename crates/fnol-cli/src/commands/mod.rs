//! Subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod claims;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use fnol_core::{DocumentExtractor, FnolConfig, Upload};

/// Platform config file location, e.g. `~/.config/fnol/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fnol")
        .join("config.json")
}

/// Resolve the config file: explicit `--config`, else the platform default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicit `--config` path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FnolConfig> {
    if let Some(path) = config_path {
        return FnolConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        FnolConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        Ok(FnolConfig::default())
    }
}

/// Extract text from a local document, or the configured sample when `input` is `None`.
pub fn read_document(input: Option<&Path>, config: &FnolConfig) -> anyhow::Result<String> {
    let extractor = DocumentExtractor::new(&config.extraction.sample_document);

    let upload = match input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            Some(Upload::from_path(path)?)
        }
        None => None,
    };

    let text = extractor.extract(upload.as_ref())?;
    Ok(text)
}
