//! # Clipkeep Client
//!
//! Talks to a content-addressed blob server: discovery, remote signing,
//! string and blob uploads, duplicate lookups and claim publishing.
//!
//! ## Overview
//!
//! The orchestrator depends only on the [`Signer`] and [`BlobStore`] traits.
//! [`ServerConnection`] implements both over HTTP once a [`Discovery`]
//! document has been fetched; [`memory`] provides in-process versions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clipkeep_client::{publish, ServerConnection};
//! use clipkeep_core::{attr, ClaimType};
//!
//! async fn example() -> clipkeep_client::Result<()> {
//!     let server = url::Url::parse("http://localhost:3179/").unwrap();
//!     let conn = ServerConnection::connect(reqwest::Client::new(), &server).await?;
//!
//!     let permanode = publish::create_permanode(&conn, &conn).await?;
//!     publish::update_permanode_attr(
//!         &conn,
//!         &conn,
//!         &permanode,
//!         ClaimType::AddAttribute,
//!         attr::TAG,
//!         "cats",
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod publish;
mod response;
pub mod transport;

pub use connection::ServerConnection;
pub use discovery::{parse_server_url, Discovery, Endpoints, SigningDiscovery};
pub use error::{core_kind, ClientError, ErrorKind, Result};
pub use fetch::{fetch_source, ImageSource};
pub use transport::{memory, BlobStore, Signer};
