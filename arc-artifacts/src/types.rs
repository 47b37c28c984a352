//! Core domain types for the Arc Artifacts SDK.

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

/// Attestation kinds recognised by the provenance registry.
///
/// The registry itself stores the kind as an opaque `uint8`; this enum is
/// the closed set of codes the protocol currently assigns meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum AttestationKind {
    /// Provenance of the underlying source material.
    Source = 1,
    /// Quality assessment.
    Quality = 2,
    /// Editorial or peer review.
    Review = 3,
    /// Licensing claim.
    License = 4,
}

impl AttestationKind {
    /// Decode a registry kind code. Unknown codes yield [`None`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Source),
            2 => Some(Self::Quality),
            3 => Some(Self::Review),
            4 => Some(Self::License),
            _ => None,
        }
    }

    /// The on-chain code for this kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable label, as shown on attestation badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Quality => "Quality",
            Self::Review => "Review",
            Self::License => "License",
        }
    }
}

/// Label for a raw kind code, tolerating codes the protocol has not
/// assigned yet.
#[must_use]
pub fn attestation_kind_label(code: u8) -> &'static str {
    AttestationKind::from_code(code).map_or("Unknown", AttestationKind::label)
}

/// A decoded `ArtifactPublished` record for a single artifact.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArtifactPublication {
    /// The published artifact's id.
    pub artifact_id: U256,
    /// Account that published the artifact.
    pub publisher: Address,
    /// Parent artifact, or `None` for a root publication (the on-chain
    /// sentinel of zero).
    pub parent_id: Option<U256>,
    /// Usage policy contract governing the artifact.
    pub usage_policy: Address,
    /// Content hash committed at publication time.
    pub content_hash: B256,
    /// Transaction that emitted the event.
    pub tx_hash: B256,
    /// Block the event landed in.
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for kind in [
            AttestationKind::Source,
            AttestationKind::Quality,
            AttestationKind::Review,
            AttestationKind::License,
        ] {
            assert_eq!(
                AttestationKind::from_code(kind.code()),
                Some(kind),
                "kind code must round-trip"
            );
        }
    }

    #[test]
    fn unknown_codes_are_tolerated() {
        assert_eq!(AttestationKind::from_code(0), None, "zero is unassigned");
        assert_eq!(AttestationKind::from_code(250), None, "high codes are unassigned");
        assert_eq!(attestation_kind_label(3), "Review", "assigned codes label themselves");
        assert_eq!(attestation_kind_label(99), "Unknown", "unassigned codes label as Unknown");
    }
}
