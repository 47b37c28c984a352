//! Artifact lineage graph reconstruction engine.
//!
//! Rebuilds the derivation/attestation forest of an Arc artifact
//! collection from on-chain event logs: chunked log fetching within the
//! RPC's range limits, typed relation extraction for both registry
//! schemas, and forest assembly with aggregate metrics.

pub mod config;
pub mod extract;
pub mod fetcher;
pub mod graph;
pub mod reconstruct;

pub use graph::{LineageNode, ProvenanceGraph};
pub use reconstruct::{ReconstructOptions, Reconstruction, reconstruct};
