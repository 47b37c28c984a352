//! Chunked `eth_getLogs` fetching.
//!
//! The Arc public RPC rejects log queries spanning more than a few
//! thousand blocks, so a history scan is split into consecutive
//! fixed-width windows. Windows are queried strictly in ascending order
//! and a failed window is recorded as degraded and skipped: a gap in
//! history reduces completeness but must never abort the reconstruction.

use std::time::Duration;

use alloy::primitives::{Address, B256};
use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log};
use anyhow::anyhow;
use serde::Serialize;

/// Maximum width of a single `eth_getLogs` window, in blocks. Chosen to
/// stay under the public node's per-call range limit.
pub const MAX_WINDOW: u64 = 9_000;

/// Per-request timeout for RPC calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One block-range window of a chunked scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    /// First block of the window (inclusive).
    pub from: u64,
    /// Last block of the window (inclusive).
    pub to: u64,
}

/// Outcome of querying a single window.
#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    /// The window that was queried.
    pub window: Window,
    /// Number of logs the window contributed.
    pub logs: usize,
    /// The failure that degraded this window to empty, if any.
    pub error: Option<String>,
}

/// Per-window outcomes of one or more chunked scans.
///
/// Surfaced to the caller next to the fetched logs so that degraded
/// history is observable instead of silently missing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    /// One entry per queried window, in query order.
    pub windows: Vec<WindowReport>,
}

impl FetchReport {
    /// Number of windows that failed and were treated as empty.
    #[must_use]
    pub fn degraded(&self) -> usize {
        self.windows.iter().filter(|w| w.error.is_some()).count()
    }

    /// `true` when every window was fetched successfully.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.degraded() == 0
    }

    /// Fold another scan's outcomes into this report.
    pub fn merge(&mut self, other: Self) {
        self.windows.extend(other.windows);
    }
}

/// Split `[from, to]` into consecutive, non-overlapping windows no wider
/// than [`MAX_WINDOW`]. Empty when `from > to`.
#[must_use]
pub fn windows(from: u64, to: u64) -> Vec<Window> {
    let mut out = Vec::new();
    let mut cursor = from;
    while cursor <= to {
        let end = (cursor + MAX_WINDOW).min(to);
        out.push(Window { from: cursor, to: end });
        cursor = end + 1;
    }
    out
}

/// Fetch all logs for one event signature from `address` in `[from, to]`.
///
/// Issues one range query per window, in ascending block order, so the
/// returned logs are non-decreasing by block number across windows. A
/// window that errors (network failure, node-side rejection) is logged,
/// recorded in the report, and treated as empty; the scan continues with
/// the next window.
pub async fn fetch_logs_in_range<P: Provider>(
    provider: &P,
    address: Address,
    event_signature: B256,
    from: u64,
    to: u64,
) -> (Vec<Log>, FetchReport) {
    let mut logs = Vec::new();
    let mut report = FetchReport::default();

    for window in windows(from, to) {
        let filter = Filter::new()
            .address(address)
            .event_signature(event_signature)
            .from_block(window.from)
            .to_block(window.to);

        let result = tokio::time::timeout(REQUEST_TIMEOUT, provider.get_logs(&filter))
            .await
            .map_err(|_| anyhow!("request timed out"))
            .and_then(|r| r.map_err(|e| anyhow!("{e}")));

        match result {
            Ok(batch) => {
                report.windows.push(WindowReport {
                    window,
                    logs: batch.len(),
                    error: None,
                });
                logs.extend(batch);
            }
            Err(e) => {
                tracing::warn!(
                    from = window.from,
                    to = window.to,
                    error = %e,
                    "window fetch failed, continuing with a gap"
                );
                report.windows.push(WindowReport {
                    window,
                    logs: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    (logs, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_range_into_bounded_windows() {
        let w = windows(0, 20_000);
        assert_eq!(
            w,
            vec![
                Window { from: 0, to: 9_000 },
                Window { from: 9_001, to: 18_000 },
                Window { from: 18_001, to: 20_000 },
            ],
            "a 20k-block range needs exactly three windows"
        );
    }

    #[test]
    fn short_ranges_use_one_window() {
        assert_eq!(
            windows(100, 200),
            vec![Window { from: 100, to: 200 }],
            "a sub-window range is queried in one call"
        );
        assert_eq!(
            windows(42, 42),
            vec![Window { from: 42, to: 42 }],
            "a single block is a valid window"
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(windows(10, 9).is_empty(), "nothing to scan when from > to");
    }

    #[test]
    fn windows_are_contiguous() {
        let w = windows(25_900_000, 26_950_000);
        for pair in w.windows(2) {
            assert_eq!(pair[1].from, pair[0].to + 1, "windows must not overlap or leave gaps");
        }
        assert_eq!(w.first().map(|x| x.from), Some(25_900_000), "scan starts at from");
        assert_eq!(w.last().map(|x| x.to), Some(26_950_000), "scan ends at to");
    }

    #[test]
    fn report_tracks_degradation() {
        let ok = WindowReport {
            window: Window { from: 0, to: 9_000 },
            logs: 3,
            error: None,
        };
        let bad = WindowReport {
            window: Window { from: 9_001, to: 18_000 },
            logs: 0,
            error: Some("boom".into()),
        };

        let mut report = FetchReport { windows: vec![ok] };
        assert!(report.is_complete(), "no errors yet");

        report.merge(FetchReport { windows: vec![bad] });
        assert_eq!(report.degraded(), 1, "merged report counts the failed window");
        assert!(!report.is_complete(), "a degraded window marks the report incomplete");
    }
}
