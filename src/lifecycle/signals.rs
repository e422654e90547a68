//! OS signal handling.
//!
//! # Responsibilities
//! - Subscribe to SIGINT and SIGTERM
//! - Translate them into a stream of `Signal` values for the shutdown coordinator
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Deliveries between subscription and the first poll are buffered
//! - Every delivery is forwarded; deduplication belongs to the coordinator

use std::fmt;

use futures_util::stream::{self, BoxStream, StreamExt};

/// Stream of termination signals, as consumed by the shutdown coordinator.
pub type SignalStream = BoxStream<'static, Signal>;

/// Termination signals the service reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stream of termination signals delivered to this process.
#[cfg(unix)]
pub fn termination_signals() -> std::io::Result<SignalStream> {
    use tokio::signal::unix::{signal, SignalKind};

    let interrupt = signal(SignalKind::interrupt())?;
    let terminate = signal(SignalKind::terminate())?;

    Ok(stream::unfold((interrupt, terminate), |(mut interrupt, mut terminate)| async move {
        let received = tokio::select! {
            Some(()) = interrupt.recv() => Signal::Interrupt,
            Some(()) = terminate.recv() => Signal::Terminate,
            else => return None,
        };
        Some((received, (interrupt, terminate)))
    })
    .boxed())
}

/// Stream of termination signals delivered to this process.
#[cfg(not(unix))]
pub fn termination_signals() -> std::io::Result<SignalStream> {
    Ok(stream::unfold((), |()| async move {
        tokio::signal::ctrl_c().await.ok()?;
        Some((Signal::Interrupt, ()))
    })
    .boxed())
}
