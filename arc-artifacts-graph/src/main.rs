//! Arc artifact lineage explorer CLI.
//!
//! Reconstructs the provenance graph of an artifact collection from
//! on-chain event logs and renders it as a tree with aggregate metrics
//! and a transaction list.
//!
//! # Usage
//!
//! ```bash
//! # Reconstruct the graph for a collection (or the V1 artifact registry)
//! arc-artifacts-graph graph 0xD76546043E4d9bb7fA3Bd73533A02c82aE4be2f8
//!
//! # Emit the graph and fetch diagnostics as JSON
//! arc-artifacts-graph graph 0x8702...3365 --json
//!
//! # Show the latest publication record for one artifact
//! arc-artifacts-graph artifact 12
//!
//! # List known network deployments
//! arc-artifacts-graph networks
//! ```

use std::path::PathBuf;

use alloy::primitives::{Address, B256, U256};
use alloy::providers::ProviderBuilder;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use arc_artifacts::types::attestation_kind_label;
use arc_artifacts::{Network, fetch_artifact_published};
use arc_artifacts_graph::config::Config;
use arc_artifacts_graph::graph::ProvenanceGraph;
use arc_artifacts_graph::reconstruct::{ReconstructOptions, Reconstruction, reconstruct};

/// Arc artifact lineage explorer.
#[derive(Debug, Parser)]
#[command(name = "arc-artifacts-graph", version, about)]
struct Cli {
    /// Path to an optional `config.toml`.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Override the RPC endpoint (otherwise config, then built-in default).
    #[arg(long, global = true)]
    rpc: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Reconstruct and render the lineage graph for a contract address.
    Graph {
        /// The collection or registry address to inspect.
        contract: Address,

        /// Filter registry events to this NFT collection instead of the
        /// inspected address itself.
        #[arg(long)]
        nft: Option<Address>,

        /// First block to scan (default: the deployment block).
        #[arg(long)]
        from_block: Option<u64>,

        /// Last block to scan (default: the current chain head).
        #[arg(long)]
        to_block: Option<u64>,

        /// Emit the graph and fetch diagnostics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the latest publication record for an artifact id.
    Artifact {
        /// The artifact id (decimal or 0x-prefixed hex).
        id: U256,

        /// Registry to query (default: the known `ArtifactRegistryV1`).
        #[arg(long)]
        registry: Option<Address>,
    },

    /// List all known network deployments.
    Networks,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let network = Network::ArcTestnet;

    let urls = match cli.rpc {
        Some(url) => vec![url],
        None => config.rpc_urls(network.default_rpc()),
    };

    match cli.command {
        Command::Graph {
            contract,
            nft,
            from_block,
            to_block,
            json,
        } => {
            let options = ReconstructOptions {
                from_block: from_block.or(config.graph.from_block),
                to_block,
                nft,
            };
            cmd_graph(&urls, contract, &options, json).await
        }
        Command::Artifact { id, registry } => {
            let registry = registry.unwrap_or(network.addresses().artifact_registry);
            cmd_artifact(&urls, registry, id, network).await
        }
        Command::Networks => {
            cmd_networks();
            Ok(())
        }
    }
}

/// Reconstruct via each RPC in order, falling back on orchestration
/// failure.
async fn reconstruct_with_fallback(
    urls: &[String],
    contract: Address,
    options: &ReconstructOptions,
) -> Result<Reconstruction> {
    let mut last_err = None;

    for (i, url) in urls.iter().enumerate() {
        let result = async {
            let provider = ProviderBuilder::new()
                .connect_http(url.parse().with_context(|| format!("invalid RPC URL: {url}"))?);
            reconstruct(&provider, contract, options).await
        }
        .await;

        match result {
            Ok(reconstruction) => return Ok(reconstruction),
            Err(e) => {
                if i + 1 < urls.len() {
                    tracing::warn!(rpc = %url, next = %urls[i + 1], error = %e, "RPC failed, falling back");
                } else {
                    tracing::error!(rpc = %url, error = %e, "last RPC failed");
                }
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) => Err(e.context("reconstruction failed on every RPC; try again")),
        None => bail!("no RPC endpoints configured"),
    }
}

/// Execute the `graph` subcommand.
#[allow(clippy::print_stdout)]
async fn cmd_graph(
    urls: &[String],
    contract: Address,
    options: &ReconstructOptions,
    json: bool,
) -> Result<()> {
    let reconstruction = reconstruct_with_fallback(urls, contract, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reconstruction)?);
        return Ok(());
    }

    let graph = &reconstruction.graph;
    println!("Lineage of {contract}");
    println!(
        "  assets: {}   derivatives: {}   attestations: {}   max depth: {}",
        graph.total_assets, graph.total_derivatives, graph.total_attestations, graph.max_depth,
    );

    if !reconstruction.report.is_complete() {
        println!(
            "  note: {} of {} block windows failed to fetch; the graph may be missing history",
            reconstruction.report.degraded(),
            reconstruction.report.windows.len(),
        );
    }

    println!();
    print_tree(graph);
    println!();
    print_transactions(graph);
    Ok(())
}

/// Render the forest as an indented tree.
#[allow(clippy::print_stdout)]
fn print_tree(graph: &ProvenanceGraph) {
    if graph.is_empty() {
        println!("(no artifacts found)");
        return;
    }
    for (depth, node) in graph.walk() {
        let indent = "  ".repeat(depth - 1);
        let mut line = format!("{indent}#{} by {}", node.id, node.actor);
        if node.block_number > 0 {
            line.push_str(&format!(" @ block {}", node.block_number));
        }
        for attestation in &node.attestations {
            line.push_str(&format!(" [{}]", attestation_kind_label(attestation.kind)));
        }
        println!("{line}");
    }
}

/// Render every transaction behind the graph, oldest first.
#[allow(clippy::print_stdout)]
fn print_transactions(graph: &ProvenanceGraph) {
    let mut rows: Vec<(u64, B256, String)> = Vec::new();
    for node in graph.nodes() {
        if node.tx_hash != B256::ZERO {
            rows.push((node.block_number, node.tx_hash, format!("derive #{}", node.id)));
        }
        for attestation in &node.attestations {
            rows.push((
                attestation.block_number,
                attestation.tx_hash,
                format!(
                    "attest #{} ({})",
                    attestation.subject_id,
                    attestation_kind_label(attestation.kind)
                ),
            ));
        }
    }
    rows.sort_by_key(|(block, _, _)| *block);

    println!("Transactions ({}):", rows.len());
    for (block, tx, action) in rows {
        println!("  {block:>10}  {tx}  {action}");
    }
}

/// Execute the `artifact` subcommand.
#[allow(clippy::print_stdout)]
async fn cmd_artifact(urls: &[String], registry: Address, id: U256, network: Network) -> Result<()> {
    let mut last_err = None;

    for url in urls {
        let result = async {
            let provider = ProviderBuilder::new()
                .connect_http(url.parse().with_context(|| format!("invalid RPC URL: {url}"))?);
            fetch_artifact_published(&provider, registry, id)
                .await
                .context("querying publication record")
        }
        .await;

        match result {
            Ok(Some(publication)) => {
                println!("Artifact #{id}");
                println!("  publisher: {}", publication.publisher);
                match publication.parent_id {
                    Some(parent) => println!("  parent:    #{parent}"),
                    None => println!("  parent:    (root publication)"),
                }
                println!("  policy:    {}", publication.usage_policy);
                println!("  content:   {}", publication.content_hash);
                println!("  block:     {}", publication.block_number);
                println!("  tx:        {}", network.explorer_tx_url(publication.tx_hash));
                return Ok(());
            }
            Ok(None) => {
                println!("Artifact #{id} was never published.");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(rpc = %url, error = %e, "RPC failed");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) => Err(e.context("artifact lookup failed on every RPC; try again")),
        None => bail!("no RPC endpoints configured"),
    }
}

/// Execute the `networks` subcommand.
#[allow(clippy::print_stdout)]
fn cmd_networks() {
    println!(
        "{:<12} {:<14} {:<15} {:<44} RPC",
        "Chain ID", "Name", "Deploy Block", "Artifact Registry"
    );
    println!("{}", "-".repeat(120));

    for network in Network::ALL {
        println!(
            "{:<12} {:<14} {:<15} {:<44} {}",
            network.chain_id(),
            format!("{network:?}"),
            network.deployment_block(),
            network.addresses().artifact_registry.to_string(),
            network.default_rpc(),
        );
    }
}
