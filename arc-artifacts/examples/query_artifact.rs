#![allow(clippy::print_stdout)]
//! Query the latest publication record for an artifact on Arc Testnet.
//!
//! Usage:
//!   cargo run --example `query_artifact`

use alloy::primitives::U256;
use alloy::providers::ProviderBuilder;
use arc_artifacts::{Network, fetch_artifact_published, types::attestation_kind_label};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let network = Network::ArcTestnet;
    let provider = ProviderBuilder::new().connect_http(network.default_rpc().parse()?);

    let registry = network.addresses().artifact_registry;
    let artifact_id = U256::from(1);

    match fetch_artifact_published(&provider, registry, artifact_id).await? {
        Some(publication) => {
            println!("Artifact #{artifact_id}");
            println!("  Publisher: {}", publication.publisher);
            match publication.parent_id {
                Some(parent) => println!("  Parent:    #{parent}"),
                None => println!("  Parent:    (root publication)"),
            }
            println!("  Policy:    {}", publication.usage_policy);
            println!("  Content:   {}", publication.content_hash);
            println!("  Tx:        {}", network.explorer_tx_url(publication.tx_hash));
        }
        None => println!("Artifact #{artifact_id} was never published."),
    }

    // Kind codes render the same way the attestation badges do.
    println!("Kind 1 is labelled {:?}", attestation_kind_label(1));

    Ok(())
}
