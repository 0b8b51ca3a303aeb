//! Descending block-window schedule for the adaptive log fetcher.
//!
//! Node providers cap the number of logs (or the block span) a single
//! `eth_getLogs` call may return, and the cap is neither fixed nor reliably
//! documented. When a provider rejects a window without telling us how far we
//! may go, the fetcher falls back to this schedule, shrinking the requested
//! window geometrically until a request succeeds or the window is empty.

/// Default window sizes, halving from `0x200000` blocks down to the terminal
/// zero-size window.
pub const DEFAULT_WINDOW_STEPS: [u64; 23] = [
    0x200000, 0x100000, 0x080000, 0x040000, 0x020000, 0x010000, 0x008000, 0x004000, 0x002000,
    0x001000, 0x000800, 0x000400, 0x000200, 0x000100, 0x000080, 0x000040, 0x000020, 0x000010,
    0x000008, 0x000004, 0x000002, 0x000001, 0x000000,
];

/// An invalid window schedule, rejected at construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The schedule contains no steps at all.
    #[error("window schedule must not be empty")]
    Empty,
    /// Two consecutive steps are not strictly decreasing.
    #[error("window schedule must be strictly decreasing ({0} followed by {1})")]
    NotDecreasing(u64, u64),
    /// The final step is not zero.
    #[error("window schedule must terminate at a zero-size window")]
    MissingTerminator,
}

/// A validated, strictly decreasing sequence of block-window sizes ending at
/// zero.
///
/// The terminal zero guarantees the fetcher's narrowing loop always reaches an
/// empty window and therefore terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSchedule {
    steps: Vec<u64>,
}

impl FetchSchedule {
    /// Validates and wraps a window schedule.
    pub fn new(steps: Vec<u64>) -> Result<Self, ScheduleError> {
        let Some(&last) = steps.last() else {
            return Err(ScheduleError::Empty);
        };
        for pair in steps.windows(2) {
            if pair[1] >= pair[0] {
                return Err(ScheduleError::NotDecreasing(pair[0], pair[1]));
            }
        }
        if last != 0 {
            return Err(ScheduleError::MissingTerminator);
        }
        Ok(Self { steps })
    }

    /// The largest window size. The fetcher's initial window is twice this.
    pub fn largest_step(&self) -> u64 {
        self.steps[0]
    }

    /// All steps, largest first, ending at zero.
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }
}

impl Default for FetchSchedule {
    fn default() -> Self {
        Self { steps: DEFAULT_WINDOW_STEPS.to_vec() }
    }
}
