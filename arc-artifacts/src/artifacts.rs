//! Single-artifact publication lookup.

use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;

use crate::contracts::ArtifactPublished;
use crate::error::Result;
use crate::types::ArtifactPublication;

/// Fetch the latest `ArtifactPublished` record for `artifact_id`.
///
/// Issues one topic-filtered log query over the registry's whole history;
/// the indexed `artifactId` keeps the result set small enough that no
/// range chunking is needed. Re-publications supersede older ones, so the
/// newest matching log wins. Returns `None` when the artifact was never
/// published.
///
/// # Errors
///
/// Returns an error if the chain head cannot be resolved or the log query
/// fails.
pub async fn fetch_artifact_published<P: Provider>(
    provider: &P,
    registry: Address,
    artifact_id: U256,
) -> Result<Option<ArtifactPublication>> {
    let head = provider.get_block_number().await?;

    let filter = Filter::new()
        .address(registry)
        .event_signature(ArtifactPublished::SIGNATURE_HASH)
        .topic1(B256::from(artifact_id))
        .from_block(0u64)
        .to_block(head);

    let logs = provider.get_logs(&filter).await?;

    Ok(logs.iter().rev().find_map(|log| {
        let decoded = log.log_decode::<ArtifactPublished>().ok()?;
        let event = decoded.inner.data;
        Some(ArtifactPublication {
            artifact_id: event.artifactId,
            publisher: event.publisher,
            parent_id: (!event.parentId.is_zero()).then_some(event.parentId),
            usage_policy: event.usagePolicy,
            content_hash: event.contentHash,
            tx_hash: log.transaction_hash.unwrap_or_default(),
            block_number: log.block_number.unwrap_or_default(),
        })
    }))
}
