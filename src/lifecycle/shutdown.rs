//! Shutdown coordination for the service.
//!
//! # State Machine
//! ```text
//! RUNNING → STOPPING: SIGINT/SIGTERM received (close requested)
//!                     or the messaging transport reported closed
//! STOPPING → exit:    transport close observed, or nothing left to close
//! ```
//!
//! # Design Decisions
//! - One task owns both the signal stream and the transport close notice
//! - A one-shot latch makes repeated signals no-ops
//! - No drain: in-flight requests and writes are not awaited

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{Stream, StreamExt};

use crate::lifecycle::signals::Signal;
use crate::messaging::{CloseNotice, SharedTransport};
use crate::observability::metrics;

/// Service lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Stopping,
}

/// One-shot RUNNING → STOPPING latch.
#[derive(Debug, Default)]
pub struct ShutdownLatch {
    stopping: AtomicBool,
}

impl ShutdownLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to STOPPING. Returns true only for the call that made the transition.
    pub fn trigger(&self) -> bool {
        self.stopping
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn state(&self) -> LifecycleState {
        if self.stopping.load(Ordering::SeqCst) {
            LifecycleState::Stopping
        } else {
            LifecycleState::Running
        }
    }
}

/// What ended the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// A termination signal, after the transport (if any) closed.
    Signal(Signal),
    /// The transport closed without a signal asking for it.
    TransportClosed,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Signal(_) => "signal",
            ShutdownReason::TransportClosed => "transport_closed",
        }
    }
}

/// Coordinator for shutdown.
///
/// Owns the messaging handle's close side. `run` resolves exactly once; the
/// caller exits the process on return.
pub struct ShutdownCoordinator {
    transport: Option<SharedTransport>,
    latch: Arc<ShutdownLatch>,
}

impl ShutdownCoordinator {
    /// Create a coordinator. `transport` is `None` when messaging never came up.
    pub fn new(transport: Option<SharedTransport>) -> Self {
        Self {
            transport,
            latch: Arc::new(ShutdownLatch::new()),
        }
    }

    /// Shared view of the lifecycle state.
    pub fn latch(&self) -> Arc<ShutdownLatch> {
        self.latch.clone()
    }

    /// Wait for a shutdown trigger and carry it through.
    pub async fn run<S>(self, mut signals: S) -> ShutdownReason
    where
        S: Stream<Item = Signal> + Unpin,
    {
        let mut close_notice = self.transport.as_ref().map(|t| t.close_notice());
        let mut signals_open = true;
        let mut requested_by: Option<Signal> = None;

        loop {
            tokio::select! {
                received = signals.next(), if signals_open => match received {
                    Some(signal) => {
                        if let Some(reason) = self.on_signal(signal, &mut requested_by).await {
                            return self.finish(reason);
                        }
                    }
                    None => signals_open = false,
                },
                () = wait_closed(close_notice.as_mut()) => {
                    self.latch.trigger();
                    tracing::info!("NATS connection closed");
                    let reason = requested_by
                        .map(ShutdownReason::Signal)
                        .unwrap_or(ShutdownReason::TransportClosed);
                    return self.finish(reason);
                }
            }
        }
    }

    /// Handle one signal. Returns a reason when there is nothing left to wait for.
    async fn on_signal(
        &self,
        signal: Signal,
        requested_by: &mut Option<Signal>,
    ) -> Option<ShutdownReason> {
        if !self.latch.trigger() {
            tracing::debug!(signal = %signal, "Shutdown already in progress, ignoring signal");
            return None;
        }
        *requested_by = Some(signal);

        let Some(transport) = &self.transport else {
            tracing::info!(signal = %signal, "Termination signal received, no messaging connection to close");
            return Some(ShutdownReason::Signal(signal));
        };

        tracing::info!(signal = %signal, "Termination signal received, closing NATS connection");
        match transport.close().await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %e, "NATS connection did not close cleanly");
                Some(ShutdownReason::Signal(signal))
            }
        }
    }

    fn finish(&self, reason: ShutdownReason) -> ShutdownReason {
        metrics::record_shutdown(reason.as_str());
        tracing::info!(reason = reason.as_str(), "Orders service stopped");
        reason
    }
}

async fn wait_closed(notice: Option<&mut CloseNotice>) {
    match notice {
        Some(notice) => notice.closed().await,
        None => std::future::pending().await,
    }
}
