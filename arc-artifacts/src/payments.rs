//! USDC payment detection in transaction receipts.
//!
//! Arc's gas token is USDC, exposed through a standard ERC-20 predeploy.
//! Artifact usage payments therefore show up as `Transfer` logs from that
//! predeploy in the paying transaction's receipt.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::Log;
use serde::Serialize;

use crate::contracts::Transfer;
use crate::networks::{ARC_NATIVE_USDC, USDC_DECIMALS};

/// A USDC payment observed in a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsdcPayment {
    /// Account that received the payment.
    pub recipient: Address,
    /// Raw amount in USDC base units.
    pub amount: U256,
}

/// Best-effort: extract the first USDC `Transfer` from a receipt's logs.
///
/// Returns `None` when no ERC-20 transfer from the native USDC predeploy
/// is present; callers can treat that as "trace required".
#[must_use]
pub fn extract_usdc_payment(logs: &[Log]) -> Option<UsdcPayment> {
    logs.iter().find_map(|log| {
        if log.address() != ARC_NATIVE_USDC {
            return None;
        }
        let transfer = log.log_decode::<Transfer>().ok()?.inner.data;
        // Mint/burn-style transfers carry no payee.
        if transfer.to == Address::ZERO {
            return None;
        }
        Some(UsdcPayment {
            recipient: transfer.to,
            amount: transfer.value,
        })
    })
}

/// Render a raw USDC amount as a decimal string, trimming trailing zeros.
#[must_use]
pub fn format_usdc(amount: U256) -> String {
    let base = U256::from(10u64).pow(U256::from(USDC_DECIMALS));
    let whole = amount / base;
    let frac = amount % base;
    if frac.is_zero() {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", frac.to_string(), width = USDC_DECIMALS as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
