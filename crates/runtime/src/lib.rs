//! Runtime utilities for logscope.

pub mod shutdown;

pub use shutdown::{ShutdownHandle, ShutdownSignal, ShutdownToken, shutdown_channel};
