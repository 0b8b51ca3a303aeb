//! Shared primitives for logscope: hex input validation and the descending
//! block-window schedule used by the log fetcher.

pub mod hex;
pub mod schedule;
