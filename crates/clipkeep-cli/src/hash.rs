//! # Hash Subcommand
//!
//! Computes the blob reference of a local file or a `data:` URL without
//! contacting a server. Useful for checking what `clip` would look up.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use clipkeep::core::{BlobRef, DataUrl, HashAlgorithm};

/// Arguments for the `clipkeep hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Path to a file, or an inline `data:` URL.
    #[arg(value_name = "FILE|DATA_URL")]
    pub input: String,

    /// Digest algorithm (sha1, sha224, blake3).
    #[arg(long, default_value = "sha1")]
    pub algorithm: HashAlgorithm,
}

/// Execute the hash subcommand.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    let reference = compute(&args.input, args.algorithm)?;
    println!("{reference}");
    Ok(0)
}

fn compute(input: &str, algorithm: HashAlgorithm) -> Result<BlobRef> {
    let bytes = if DataUrl::is_data_url(input) {
        DataUrl::parse(input)?.decode()?.to_vec()
    } else {
        let path = Path::new(input);
        std::fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?
    };
    tracing::debug!(size = bytes.len(), %algorithm, "hashing input");
    Ok(BlobRef::compute(algorithm, &bytes))
}
