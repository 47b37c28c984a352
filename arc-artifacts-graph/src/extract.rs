//! Typed extraction of lineage records from raw event logs.
//!
//! Two upstream schemas describe "this artifact came from that one":
//! the shared `ProvenanceRegistryV2` (per-collection `Derived` /
//! `Attested` events, filtered by the `nft` field) and the standalone
//! `ArtifactRegistryV1` (`ArtifactPublished`, where the emitting contract
//! is the filter and a zero parent marks a root). Both decode into the
//! same [`DerivationRelation`] shape so the assembler never needs to know
//! which registry the history came from.
//!
//! Extraction is total: a log that fails to decode, or that targets a
//! different collection, yields [`None`] and is skipped.

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;
use serde::Serialize;

use arc_artifacts::contracts::{ArtifactPublished, Attested, Derived};

/// A parent→child derivation edge decoded from a log, before assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivationRelation {
    /// Parent artifact, or `None` for a root creation (wire sentinel of
    /// zero).
    pub parent_id: Option<U256>,
    /// The derived artifact.
    pub child_id: U256,
    /// Account that performed the derivation or publication.
    pub actor: Address,
    /// Opaque reference committed with the event.
    pub reference: B256,
    /// Transaction that emitted the event (zero when still pending).
    pub tx_hash: B256,
    /// Block the event landed in.
    pub block_number: u64,
}

/// A signed claim about an artifact, attached to its lineage node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttestationRecord {
    /// The artifact the claim is about.
    pub subject_id: U256,
    /// Account that made the claim.
    pub attester: Address,
    /// Registry kind code; see `arc_artifacts::AttestationKind`.
    pub kind: u8,
    /// Opaque reference committed with the claim.
    pub reference: B256,
    /// Hash of the claim payload.
    pub payload_hash: B256,
    /// Transaction that emitted the event (zero when still pending).
    pub tx_hash: B256,
    /// Block the event landed in.
    pub block_number: u64,
}

/// Zero on the wire means "no parent"; neither registry ever assigns id 0.
fn parent_from_wire(raw: U256) -> Option<U256> {
    (!raw.is_zero()).then_some(raw)
}

/// Decode a `Derived` log into a relation, keeping only events for the
/// `nft` collection under inspection.
#[must_use]
pub fn derivation_from_log(log: &Log, nft: Address) -> Option<DerivationRelation> {
    let decoded = log.log_decode::<Derived>().ok()?;
    let event = decoded.inner.data;
    if event.nft != nft {
        return None;
    }
    Some(DerivationRelation {
        parent_id: parent_from_wire(event.parentId),
        child_id: event.childId,
        actor: event.actor,
        reference: event.refHash,
        tx_hash: log.transaction_hash.unwrap_or_default(),
        block_number: log.block_number.unwrap_or_default(),
    })
}

/// Decode an `Attested` log, keeping only events for the `nft` collection
/// under inspection.
#[must_use]
pub fn attestation_from_log(log: &Log, nft: Address) -> Option<AttestationRecord> {
    let decoded = log.log_decode::<Attested>().ok()?;
    let event = decoded.inner.data;
    if event.nft != nft {
        return None;
    }
    Some(AttestationRecord {
        subject_id: event.tokenId,
        attester: event.attester,
        kind: event.kind,
        reference: event.refHash,
        payload_hash: event.payloadHash,
        tx_hash: log.transaction_hash.unwrap_or_default(),
        block_number: log.block_number.unwrap_or_default(),
    })
}

/// Decode an `ArtifactPublished` log into a relation.
///
/// No content filter here: the fetch is already scoped to the emitting
/// registry's address.
#[must_use]
pub fn publication_from_log(log: &Log) -> Option<DerivationRelation> {
    let decoded = log.log_decode::<ArtifactPublished>().ok()?;
    let event = decoded.inner.data;
    Some(DerivationRelation {
        parent_id: parent_from_wire(event.parentId),
        child_id: event.artifactId,
        actor: event.publisher,
        reference: event.contentHash,
        tx_hash: log.transaction_hash.unwrap_or_default(),
        block_number: log.block_number.unwrap_or_default(),
    })
}
