//! # Clipkeep Core
//!
//! Pure primitives for clipping content into a content-addressed blob server:
//! blob references, data URLs, schema objects, canonical JSON and tag lists.
//!
//! This crate contains no I/O, no networking. It is pure computation over the
//! objects the upload protocol exchanges with the server.
//!
//! ## Key Types
//!
//! - [`BlobRef`] - Content-derived reference (`<algorithm>-<hexdigest>`)
//! - [`SchemaObject`] - Tagged union of the permanode and claim objects
//! - [`SignedText`] - Verbatim signed JSON as returned by the signing handler
//! - [`TagList`] - Validated, comma-separated tag input
//! - [`PermanodeState`] - Attribute state folded from a set of claims
//!
//! ## Canonicalization
//!
//! Objects are serialized as indented JSON with the version hoisted to the
//! first line. See [`canonical`] module.

pub mod attributes;
pub mod blobref;
pub mod canonical;
pub mod dataurl;
pub mod error;
pub mod schema;
pub mod tags;

pub use attributes::PermanodeState;
pub use blobref::{compute_reference, BlobRef, HashAlgorithm};
pub use canonical::{canonical_json, SignedEnvelope, SignedText};
pub use dataurl::DataUrl;
pub use error::{CoreError, Result};
pub use schema::{attr, Claim, ClaimType, Permanode, SchemaObject, SCHEMA_VERSION};
pub use tags::TagList;
