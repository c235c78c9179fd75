//! # clipkeep CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clipkeep_cli::clip::{run_clip, ClipArgs};
use clipkeep_cli::config::{run_config, ConfigArgs};
use clipkeep_cli::hash::{run_hash, HashArgs};

/// Clip images into a content-addressed blob server.
///
/// Each clip becomes a permanode with signed claims for the image content,
/// its source URL, the page it was found on and any tags.
#[derive(Parser, Debug)]
#[command(name = "clipkeep", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the settings file.
    #[arg(long, global = true, env = "CLIPKEEP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload an image as a new tagged permanode.
    Clip(ClipArgs),

    /// Show or change the persisted settings.
    Config(ConfigArgs),

    /// Compute the blob reference of a file or data URL.
    Hash(HashArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Hash(args) => run_hash(args),
        Commands::Clip(args) => match clipkeep_cli::settings_path(cli.config.as_deref()) {
            Ok(path) => run_clip(args, &path).await,
            Err(e) => Err(e),
        },
        Commands::Config(args) => {
            clipkeep_cli::settings_path(cli.config.as_deref()).and_then(|path| run_config(args, &path))
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(1)
        }
    }
}
