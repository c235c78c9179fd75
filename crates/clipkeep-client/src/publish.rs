//! Claim publishing.
//!
//! Every object written to the server goes through the same two steps: sign,
//! then upload the signed text as a blob. These helpers are the only place
//! that composition happens.

use clipkeep_core::{BlobRef, Claim, ClaimType, Permanode, SchemaObject};

use crate::error::Result;
use crate::transport::{BlobStore, Signer};

/// Sign `object` and upload the signed text, returning its reference.
pub async fn publish<S, B>(signer: &S, store: &B, object: SchemaObject) -> Result<BlobRef>
where
    S: Signer + ?Sized,
    B: BlobStore + ?Sized,
{
    let signed = signer.sign(object).await?;
    store.upload_string(&signed).await
}

/// Create a fresh permanode and return its reference.
pub async fn create_permanode<S, B>(signer: &S, store: &B) -> Result<BlobRef>
where
    S: Signer + ?Sized,
    B: BlobStore + ?Sized,
{
    let permanode = publish(signer, store, Permanode::new().into()).await?;
    tracing::debug!(%permanode, "permanode created");
    Ok(permanode)
}

/// Attach one attribute claim, dated now, to `permanode`.
pub async fn update_permanode_attr<S, B>(
    signer: &S,
    store: &B,
    permanode: &BlobRef,
    claim_type: ClaimType,
    attribute: &str,
    value: &str,
) -> Result<BlobRef>
where
    S: Signer + ?Sized,
    B: BlobStore + ?Sized,
{
    let claim = Claim::now(permanode.clone(), claim_type, attribute, value);
    let claim_ref = publish(signer, store, claim.into()).await?;
    tracing::debug!(%permanode, %claim_type, attribute, %claim_ref, "attribute claim added");
    Ok(claim_ref)
}
