//! # Config Subcommand
//!
//! Shows and edits the persisted server URL and default tags.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use clipkeep::Settings;

/// Arguments for the `clipkeep config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings.
    Show,

    /// Update one or more settings.
    Set {
        /// Base URL of the blob server.
        #[arg(long, value_name = "URL")]
        server: Option<String>,

        /// Comma-separated tags applied when a clip names none.
        #[arg(long, value_name = "TAGS")]
        default_tags: Option<String>,
    },
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs, settings_path: &Path) -> Result<u8> {
    match &args.command {
        ConfigCommand::Show => cmd_show(settings_path),
        ConfigCommand::Set {
            server,
            default_tags,
        } => cmd_set(settings_path, server.as_deref(), default_tags.as_deref()),
    }
}

fn cmd_show(settings_path: &Path) -> Result<u8> {
    let settings = crate::load_settings(settings_path)?;
    println!("{}", render(&settings, settings_path));
    Ok(0)
}

fn cmd_set(settings_path: &Path, server: Option<&str>, default_tags: Option<&str>) -> Result<u8> {
    if server.is_none() && default_tags.is_none() {
        bail!("nothing to set; pass --server and/or --default-tags");
    }

    let mut settings = crate::load_settings(settings_path)?;
    if let Some(server) = server {
        settings.server_url = Some(server.trim().to_string());
    }
    if let Some(tags) = default_tags {
        settings.default_tags = tags.to_string();
    }

    settings
        .save(settings_path)
        .with_context(|| format!("saving settings to {}", settings_path.display()))?;

    println!("OK: saved {}", settings_path.display());
    Ok(0)
}

fn render(settings: &Settings, settings_path: &Path) -> String {
    format!(
        "settings:     {}\nserver:       {}\ndefault tags: {}",
        settings_path.display(),
        settings.server_url.as_deref().unwrap_or("(not set)"),
        if settings.default_tags.trim().is_empty() {
            "(none)"
        } else {
            settings.default_tags.as_str()
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(server: Option<&str>, tags: Option<&str>) -> ConfigArgs {
        ConfigArgs {
            command: ConfigCommand::Set {
                server: server.map(String::from),
                default_tags: tags.map(String::from),
            },
        }
    }

    #[test]
    fn set_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        run_config(&set(Some("http://localhost:3179/"), None), &path).unwrap();
        run_config(&set(None, Some("inbox, web")), &path).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.server_url.as_deref(), Some("http://localhost:3179/"));
        assert_eq!(settings.default_tags, "inbox, web");
    }

    #[test]
    fn set_rejects_invalid_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        assert!(run_config(&set(None, Some("a,,b")), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn set_requires_a_value() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_config(&set(None, None), &dir.path().join("s.toml")).is_err());
    }

    #[test]
    fn render_defaults() {
        let text = render(&Settings::default(), Path::new("/tmp/s.toml"));
        assert!(text.contains("(not set)"));
        assert!(text.contains("(none)"));
    }
}
