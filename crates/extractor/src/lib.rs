//! Adaptive `eth_getLogs` fetcher.
//!
//! Providers cap the size of a log query, and the cap varies per provider and
//! per block range. [`LogFetcher`] requests the widest window the schedule
//! allows and narrows it on failure: when the provider names the highest
//! block it will serve, the window is re-targeted to that block directly;
//! otherwise the next (smaller) schedule step is tried. The schedule's
//! terminal zero step guarantees the loop always reaches an empty window, so
//! a single `fetch` call terminates no matter how hostile the provider is.

use alloy::{
    primitives::Address,
    providers::Provider,
    rpc::types::{Filter, Log},
    transports::TransportError,
};
use chainio::classify::{RpcFailure, classify};
use primitives::schedule::FetchSchedule;
use runtime::ShutdownToken;
use tracing::{debug, warn};

/// The result of one fetch pass: the block to resume from and the logs found.
///
/// An empty `logs` with `next_from_block` equal to the requested start block
/// means the chain had nothing (new) to serve; callers treat that as the end
/// of a backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// First block the next fetch pass should cover.
    pub next_from_block: u64,
    /// Logs found in the window that succeeded, in chain order.
    pub logs: Vec<Log>,
}

impl FetchOutcome {
    fn empty(from_block: u64) -> Self {
        Self { next_from_block: from_block, logs: Vec::new() }
    }
}

/// A failed fetch pass.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Shutdown was requested before or during the pass. The pass made no
    /// progress; resuming later from `from_block` is safe.
    #[error("fetch cancelled at block {from_block}")]
    Cancelled {
        /// The start block the cancelled pass was asked to cover.
        from_block: u64,
    },
    /// The head query failed. Window narrowing never applies to it.
    #[error("failed to query chain head")]
    Head(#[source] TransportError),
    /// Every schedule step failed before the window became empty. Unreachable
    /// with a zero-terminated schedule; kept so the invariant is visible.
    #[error("window schedule exhausted without an empty window")]
    ScheduleExhausted,
}

/// Fetches logs for one contract over adaptively sized block windows.
#[derive(Debug, Clone)]
pub struct LogFetcher<P> {
    provider: P,
    schedule: FetchSchedule,
}

impl<P: Provider> LogFetcher<P> {
    /// Creates a fetcher with the default window schedule.
    pub fn new(provider: P) -> Self {
        Self::with_schedule(provider, FetchSchedule::default())
    }

    /// Creates a fetcher with a custom window schedule.
    pub const fn with_schedule(provider: P, schedule: FetchSchedule) -> Self {
        Self { provider, schedule }
    }

    /// Fetches the next batch of logs emitted by `address`, starting at
    /// `from_block`.
    ///
    /// At most one window succeeds per call; the outcome names the block to
    /// resume from. If `from_block` is at or past the chain head, or the
    /// narrowing loop shrinks the window to nothing, the outcome is empty and
    /// `next_from_block` is the caller's `from_block` unchanged.
    pub async fn fetch(
        &self,
        from_block: u64,
        address: Address,
        shutdown: &ShutdownToken,
    ) -> Result<FetchOutcome, FetchError> {
        if shutdown.is_cancelled() {
            return Err(FetchError::Cancelled { from_block });
        }

        let head = tokio::select! {
            head = self.provider.get_block_number() => head.map_err(FetchError::Head)?,
            () = shutdown.cancelled() => {
                return Err(FetchError::Cancelled { from_block });
            }
        };
        if from_block >= head {
            debug!(from_block, head, "start block at or past chain head, nothing to fetch");
            return Ok(FetchOutcome::empty(from_block));
        }

        let mut steps = self.schedule.steps().iter().copied();
        // Open wider than the largest step so a single generous provider can
        // serve the whole backlog in one pass.
        let mut to_block =
            from_block.saturating_add(self.schedule.largest_step().saturating_mul(2));

        loop {
            if shutdown.is_cancelled() {
                return Err(FetchError::Cancelled { from_block });
            }

            let to = to_block.min(head);
            if from_block >= to {
                debug!(from_block, "window narrowed to nothing");
                return Ok(FetchOutcome::empty(from_block));
            }

            let filter = Filter::new().address(address).from_block(from_block).to_block(to);
            let attempt = tokio::select! {
                logs = self.provider.get_logs(&filter) => logs,
                () = shutdown.cancelled() => {
                    return Err(FetchError::Cancelled { from_block });
                }
            };

            match attempt {
                Ok(logs) => {
                    debug!(from_block, to_block = to, count = logs.len(), "window served");
                    return Ok(FetchOutcome { next_from_block: to + 1, logs });
                }
                Err(err) => match classify(err) {
                    RpcFailure::LimitExceeded { bound } if bound < to => {
                        // The provider named the exact window it will serve;
                        // take it without spending a schedule step.
                        debug!(from_block, to_block = to, bound, "re-targeting to provider bound");
                        to_block = bound;
                    }
                    RpcFailure::LimitExceeded { bound } => {
                        // A bound at or past the window just rejected cannot
                        // shrink it. Fall back to the schedule so the loop
                        // still terminates against a provider that keeps
                        // repeating the same bound.
                        let Some(step) = steps.next() else {
                            return Err(FetchError::ScheduleExhausted);
                        };
                        warn!(
                            from_block,
                            to_block = to,
                            bound,
                            step,
                            "provider bound does not shrink window, narrowing"
                        );
                        to_block = from_block.saturating_add(step);
                    }
                    RpcFailure::Other(err) => {
                        let Some(step) = steps.next() else {
                            return Err(FetchError::ScheduleExhausted);
                        };
                        warn!(
                            from_block,
                            to_block = to,
                            step,
                            err = %err,
                            "window rejected, narrowing"
                        );
                        to_block = from_block.saturating_add(step);
                    }
                },
            }
        }
    }
}
