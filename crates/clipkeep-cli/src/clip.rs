//! # Clip Subcommand
//!
//! Uploads one image to the configured server as a new permanode with
//! content, source, page and tag claims. Progress goes to stderr; the
//! permanode reference goes to stdout.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use clipkeep::client::{parse_server_url, ImageSource, ServerConnection};
use clipkeep::{ClipRequest, ClipUploader, Settings, UploadError, UploadStage, UploaderConfig};
use reqwest::Client;
use tokio::sync::mpsc;

/// Arguments for the `clipkeep clip` subcommand.
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Image URL or inline `data:` URL.
    #[arg(value_name = "IMAGE")]
    pub image: String,

    /// Page the image was found on.
    #[arg(long, value_name = "URL")]
    pub page: String,

    /// Comma-separated tags. Defaults to the configured default tags.
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Server URL, overriding the configured one.
    #[arg(long, value_name = "URL", env = "CLIPKEEP_SERVER")]
    pub server: Option<String>,

    /// Write attribute claims one at a time instead of concurrently.
    #[arg(long)]
    pub sequential: bool,
}

/// Execute the clip subcommand.
pub async fn run_clip(args: &ClipArgs, settings_path: &Path) -> Result<u8> {
    let settings = crate::load_settings(settings_path)?;
    let request = build_request(args, &settings)?;

    let server_url = match &args.server {
        Some(raw) => parse_server_url(raw)?,
        None => settings
            .server_url()
            .context("no server configured; run `clipkeep config set --server URL`")?,
    };

    let connection = ServerConnection::connect(Client::new(), &server_url)
        .await
        .with_context(|| format!("connecting to {server_url}"))?;

    let config = UploaderConfig {
        concurrent_claims: !args.sequential,
    };
    let (tx, mut rx) = mpsc::unbounded_channel::<UploadStage>();
    let uploader = ClipUploader::from_connection(connection, config).with_progress(tx);

    let reporter = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            eprintln!("{stage}");
        }
    });

    let result = uploader.upload(&request).await;
    // Dropping the uploader closes the channel so the reporter drains and exits.
    drop(uploader);
    let _ = reporter.await;

    match result {
        Ok(receipt) => {
            tracing::info!(content = %receipt.content, file = %receipt.file, "clip uploaded");
            println!("{}", receipt.permanode);
            Ok(0)
        }
        Err(e) => Err(describe(e)),
    }
}

/// Assemble the request, falling back to the default tags.
fn build_request(args: &ClipArgs, settings: &Settings) -> Result<ClipRequest> {
    let image = ImageSource::parse(&args.image)?;
    let tags = args
        .tags
        .clone()
        .unwrap_or_else(|| settings.default_tags.clone());
    Ok(ClipRequest::new(image, args.page.clone(), tags))
}

/// Render an upload failure as `<kind>: <message>`.
fn describe(e: UploadError) -> anyhow::Error {
    if let Some(permanode) = e.orphaned_permanode() {
        tracing::warn!(%permanode, "permanode left without all of its claims");
    }
    anyhow!("{}: {e}", e.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipkeep::client::ErrorKind;

    fn args(tags: Option<&str>) -> ClipArgs {
        ClipArgs {
            image: "https://example.com/cat.png".into(),
            page: "https://example.com/cats".into(),
            tags: tags.map(String::from),
            server: None,
            sequential: false,
        }
    }

    #[test]
    fn tags_fall_back_to_defaults() {
        let settings = Settings {
            server_url: None,
            default_tags: "inbox".into(),
        };

        let request = build_request(&args(None), &settings).unwrap();
        assert_eq!(request.tags, "inbox");

        let request = build_request(&args(Some("cats")), &settings).unwrap();
        assert_eq!(request.tags, "cats");
    }

    #[test]
    fn describe_prefixes_kind() {
        let err = UploadError::Validation(clipkeep::core::CoreError::InvalidTags("a,,b".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(describe(err).to_string().starts_with("ValidationError: "));
    }

    #[tokio::test]
    async fn missing_server_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_clip(&args(Some("x")), &dir.path().join("settings.toml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no server configured"));
    }
}
