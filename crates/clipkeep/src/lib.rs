//! # Clipkeep
//!
//! Clip images into a content-addressed blob server. Each clip becomes a
//! permanode carrying signed attribute claims for the image content, where
//! it came from and any tags.
//!
//! ## Overview
//!
//! A single upload:
//!
//! 1. fetches the image bytes from a URL or decodes a `data:` URL,
//! 2. hashes them to a blob reference,
//! 3. refuses the clip if a file with that content already exists,
//! 4. uploads the bytes through the server's upload helper,
//! 5. creates and signs a fresh permanode,
//! 6. attaches `camliContent`, `imgSrc`, `foundAt` and one `tag` per tag.
//!
//! Steps run strictly in order; the attribute claims in step 6 are issued
//! concurrently. Nothing is rolled back when a later step fails.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clipkeep::{ClipRequest, ClipUploader, UploaderConfig};
//! use clipkeep::client::{ImageSource, ServerConnection};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = url::Url::parse("http://localhost:3179/")?;
//!     let conn = ServerConnection::connect(reqwest::Client::new(), &server).await?;
//!     let uploader = ClipUploader::from_connection(conn, UploaderConfig::default());
//!
//!     let request = ClipRequest::new(
//!         ImageSource::parse("https://example.com/cat.png")?,
//!         "https://example.com/cats",
//!         "cats, cute",
//!     );
//!     let receipt = uploader.upload(&request).await?;
//!     println!("stored under {}", receipt.permanode);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `clipkeep::core` - References, schema objects, tags
//! - `clipkeep::client` - Server connection and transport traits

pub mod error;
pub mod settings;
pub mod uploader;

// Re-export component crates
pub use clipkeep_client as client;
pub use clipkeep_core as core;

pub use error::{Result, SettingsError, UploadError};
pub use settings::Settings;
pub use uploader::{ClipRequest, ClipUploader, UploadReceipt, UploadStage, UploaderConfig};
