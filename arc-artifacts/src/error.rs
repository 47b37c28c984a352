//! SDK error types.

use thiserror::Error;

/// Errors returned by SDK queries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The RPC transport failed or the node rejected the request.
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),
}

/// Convenience alias for SDK results.
pub type Result<T> = std::result::Result<T, Error>;
