//! Shutdown signalling.
//!
//! [`ShutdownSignal`] resolves on SIGINT or SIGTERM. [`shutdown_channel`]
//! produces a cloneable [`ShutdownToken`] that long-running loops poll (or
//! await) so they can stop between units of work instead of being killed
//! mid-write.

use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use futures::FutureExt;
use tokio::{
    signal::unix::{Signal, SignalKind},
    sync::watch,
};
use tracing::debug;

/// A `ShutdownSignal` is a helper struct that listens for various shutdown signal sources.
pub struct ShutdownSignal {
    /// A future that resolves when a SIGINT signal is received.
    ctrl_c: Pin<Box<dyn Future<Output = io::Result<()>> + Send>>,
    /// A future that resolves when a SIGTERM signal is received.
    term_signal: Signal,
}

impl std::fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownSignal").finish_non_exhaustive()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Creates a new `ShutdownSignal` instance.
    pub fn new() -> Self {
        let ctrl_c = Box::pin(tokio::signal::ctrl_c());
        let term_signal = tokio::signal::unix::signal(SignalKind::terminate())
            .expect("failed to install SIGTERM handler");

        Self { ctrl_c, term_signal }
    }
}

impl Future for ShutdownSignal {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.ctrl_c.poll_unpin(cx).is_ready() {
            debug!("Received SIGINT signal");
            return Poll::Ready(());
        }

        if this.term_signal.poll_recv(cx).is_ready() {
            debug!("Received SIGTERM signal");
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

/// Creates a linked shutdown handle/token pair.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownToken { rx })
}

/// The triggering side of a shutdown channel. Held by the signal listener.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Requests shutdown. All linked tokens observe it.
    pub fn trigger(&self) {
        // Receivers may already be gone; nothing to do then.
        let _ = self.tx.send(true);
    }
}

/// The observing side of a shutdown channel. Cheap to clone and pass into
/// worker loops.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Whether shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is requested. Resolves immediately if it
    /// already was.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // An Err means the handle was dropped without triggering; treat that
        // as shutdown too so loops never hang on a dead channel.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
