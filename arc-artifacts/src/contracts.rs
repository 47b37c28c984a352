//! Typed bindings for the on-chain events the SDK consumes.
//!
//! Only the read path is covered here: every query in this workspace is a
//! log-range scan, so the bindings are event-only. Parameter names follow
//! the deployed contracts except where they collide with Rust keywords
//! (`ref` becomes `refHash`); event selectors depend on types alone, so
//! decoding is unaffected.

use alloy::sol;

sol! {
    /// `ProvenanceRegistryV2`: a new artifact was derived from an existing
    /// one within the `nft` collection.
    #[derive(Debug, PartialEq, Eq)]
    event Derived(
        address indexed nft,
        uint256 indexed parentId,
        uint256 indexed childId,
        address actor,
        bytes32 refHash
    );

    /// `ProvenanceRegistryV2`: a signed claim about an artifact. Does not
    /// alter lineage.
    #[derive(Debug, PartialEq, Eq)]
    event Attested(
        address indexed nft,
        uint256 indexed tokenId,
        address indexed attester,
        uint8 kind,
        bytes32 refHash,
        bytes32 payloadHash
    );

    /// `ArtifactRegistryV1`: an artifact was published. A `parentId` of
    /// zero marks a root publication with no parent.
    #[derive(Debug, PartialEq, Eq)]
    event ArtifactPublished(
        uint256 indexed artifactId,
        address indexed publisher,
        uint256 indexed parentId,
        address usagePolicy,
        bytes32 contentHash
    );

    /// Standard ERC-20 transfer, used to spot USDC payments in receipts.
    #[derive(Debug, PartialEq, Eq)]
    event Transfer(
        address indexed from,
        address indexed to,
        uint256 value
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;
    use alloy::sol_types::SolEvent;

    #[test]
    fn selectors_match_deployed_signatures() {
        // Renaming `ref` must not change the selectors the registry emits.
        assert_eq!(
            Derived::SIGNATURE_HASH,
            keccak256("Derived(address,uint256,uint256,address,bytes32)"),
            "Derived selector drifted from the deployed event"
        );
        assert_eq!(
            Attested::SIGNATURE_HASH,
            keccak256("Attested(address,uint256,address,uint8,bytes32,bytes32)"),
            "Attested selector drifted from the deployed event"
        );
        assert_eq!(
            ArtifactPublished::SIGNATURE_HASH,
            keccak256("ArtifactPublished(uint256,address,uint256,address,bytes32)"),
            "ArtifactPublished selector drifted from the deployed event"
        );
    }
}
