//! Pre-configured network definitions with known contract addresses.
//!
//! The Artifact Protocol currently has a single deployment on Arc Testnet.
//! Each [`Network`] variant carries the contract addresses plus the
//! operational metadata (deployment block, default RPC, explorer) the graph
//! engine needs to scope its log queries.

use alloy::primitives::{Address, address};

/// Known contract addresses for a specific network deployment.
#[derive(Debug, Clone, Copy)]
pub struct NetworkAddresses {
    /// The `DigitalObjectNFT` collection (legacy Provenance v2 assets).
    pub digital_object_nft: Address,
    /// The `ProvenanceRegistryV2` contract emitting `Derived` / `Attested`.
    pub provenance_registry: Address,
    /// The `ArtifactRegistryV1` contract emitting `ArtifactPublished`.
    pub artifact_registry: Address,
    /// The `PayableUsagePolicyV1` contract.
    pub usage_policy: Address,
    /// Arc's native-gas USDC predeploy.
    pub native_usdc: Address,
}

/// Pre-defined network configurations for Artifact Protocol deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Network {
    /// Arc Testnet (chain ID 5042002).
    ArcTestnet,
}

const ARC_DIGITAL_OBJECT_NFT: Address = address!("87020198e7595C60b200EA80be41548F44573365");
const ARC_PROVENANCE_REGISTRY: Address = address!("F015b52C9739Dc8D0739e7f7700eC7bbaE9B77C7");
const ARC_ARTIFACT_REGISTRY: Address = address!("D76546043E4d9bb7fA3Bd73533A02c82aE4be2f8");
const ARC_USAGE_POLICY: Address = address!("103944642c5Cc62BbF80d967c690f3EADac2b47e");

/// Arc's native gas token is USDC at this predeploy address.
pub const ARC_NATIVE_USDC: Address = address!("3600000000000000000000000000000000000000");

/// Decimal places of the native USDC token.
pub const USDC_DECIMALS: u32 = 6;

impl Network {
    /// Returns the known contract addresses for this network.
    #[must_use]
    pub const fn addresses(self) -> NetworkAddresses {
        match self {
            Self::ArcTestnet => NetworkAddresses {
                digital_object_nft: ARC_DIGITAL_OBJECT_NFT,
                provenance_registry: ARC_PROVENANCE_REGISTRY,
                artifact_registry: ARC_ARTIFACT_REGISTRY,
                usage_policy: ARC_USAGE_POLICY,
                native_usdc: ARC_NATIVE_USDC,
            },
        }
    }

    /// Returns the EIP-155 chain ID for this network.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::ArcTestnet => 5_042_002,
        }
    }

    /// Block at which `ArtifactRegistryV1` was deployed; log scans start
    /// here unless the caller overrides the lower bound.
    #[must_use]
    pub const fn deployment_block(self) -> u64 {
        match self {
            Self::ArcTestnet => 25_900_000,
        }
    }

    /// Suggested public RPC endpoint.
    #[must_use]
    pub const fn default_rpc(self) -> &'static str {
        match self {
            Self::ArcTestnet => "https://rpc.testnet.arc.network",
        }
    }

    /// Base URL of the block explorer.
    #[must_use]
    pub const fn explorer_url(self) -> &'static str {
        match self {
            Self::ArcTestnet => "https://testnet.arcscan.app",
        }
    }

    /// All known Artifact Protocol network variants.
    pub const ALL: &[Self] = &[Self::ArcTestnet];

    /// Look up a [`Network`] by its EIP-155 chain ID.
    ///
    /// Returns [`None`] if the chain ID is not a known deployment.
    #[must_use]
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.iter().find(|n| n.chain_id() == chain_id).copied()
    }

    /// Explorer URL for a transaction hash.
    #[must_use]
    pub fn explorer_tx_url(self, tx_hash: impl std::fmt::Display) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url())
    }

    /// Explorer URL for an address.
    #[must_use]
    pub fn explorer_address_url(self, address: Address) -> String {
        format!("{}/address/{address}", self.explorer_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_round_trips() {
        for network in Network::ALL {
            assert_eq!(
                Network::from_chain_id(network.chain_id()),
                Some(*network),
                "network lookup by chain id must round-trip"
            );
        }
        assert_eq!(Network::from_chain_id(1), None, "mainnet is not a known deployment");
    }

    #[test]
    fn explorer_urls() {
        let n = Network::ArcTestnet;
        assert_eq!(
            n.explorer_address_url(ARC_ARTIFACT_REGISTRY),
            format!("https://testnet.arcscan.app/address/{ARC_ARTIFACT_REGISTRY}"),
            "address URL should point at the testnet explorer"
        );
        assert!(
            n.explorer_tx_url("0xabc").ends_with("/tx/0xabc"),
            "tx URL should end with the hash"
        );
    }
}
