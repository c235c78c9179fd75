//! # clipkeep-cli
//!
//! Provides the `clipkeep` command-line interface.
//!
//! ## Subcommands
//!
//! - `clipkeep clip` - Upload one image as a tagged permanode.
//! - `clipkeep config` - Show or change the persisted settings.
//! - `clipkeep hash` - Compute a blob reference locally.
//!
//! ```bash
//! clipkeep config set --server http://localhost:3179/ --default-tags inbox
//! clipkeep clip https://example.com/cat.png --page https://example.com/cats --tags cats,cute
//! clipkeep hash ./cat.png
//! ```

pub mod clip;
pub mod config;
pub mod hash;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clipkeep::Settings;

/// Resolve the settings file: the explicit `--config` path, else the default
/// location.
pub fn settings_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Settings::default_path()
            .context("cannot locate a settings directory; pass --config or set HOME"),
    }
}

/// Load settings from `path`, returning defaults when the file is absent.
pub fn load_settings(path: &Path) -> Result<Settings> {
    Settings::load(path).with_context(|| format!("loading settings from {}", path.display()))
}
