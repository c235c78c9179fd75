//! # Clipkeep Testkit
//!
//! Testing utilities for clipkeep.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known references and canonical texts the wire format must reproduce
//! - **Generators**: Proptest strategies for tag input, image bytes and data URLs
//! - **Fixtures**: An in-memory signer and store wired to an uploader
//!
//! ## Golden Vectors
//!
//! ```rust
//! use clipkeep_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, got) in verify_all_vectors() {
//!     assert!(ok, "{name}: {got}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use clipkeep_testkit::fixtures::{png_data_url, TestFixture};
//! use clipkeep::ClipRequest;
//! use clipkeep::client::ImageSource;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let request = ClipRequest::new(
//!     ImageSource::parse(&png_data_url()).unwrap(),
//!     "https://example.com/",
//!     "cats",
//! );
//! let receipt = fixture.uploader().upload(&request).await.unwrap();
//! assert_eq!(fixture.state(&receipt.permanode).values("tag"), ["cats"]);
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{data_url, png_data_url, TestFixture, SAMPLE_PNG};
pub use generators::{image_bytes, tag, tag_input, ClipParams};
pub use vectors::{all_canonical_vectors, all_digest_vectors, verify_all_vectors};
