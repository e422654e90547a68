//! Messaging subsystem.
//!
//! # Data Flow
//! ```text
//! MessagingConfig
//!     → nats.rs (one connect attempt, close hook)
//!     → SharedTransport (single owned handle, Arc)
//!         → registrar.rs (subscribe every listener, isolated)
//!             → listener.rs (consume loop per subject)
//!                 → listeners.rs (decode typed payloads)
//!         → lifecycle/shutdown.rs (close on signal, observe close notice)
//! ```
//!
//! # Design Decisions
//! - Transport sits behind a trait so startup and shutdown run against
//!   an in-memory bus in tests
//! - The handle is created once and never mutated; only subscribe/close are called
//! - Close is observable by any number of holders through `CloseNotice`

pub mod events;
pub mod listener;
pub mod listeners;
pub mod nats;
pub mod registrar;
pub mod transport;

pub use events::Subject;
pub use listener::{HandlerError, Listener};
pub use registrar::{ListenerRegistrar, RegistrationOutcome, RegistrationReport};
pub use transport::{
    CloseNotice, CloseSignal, Message, MessagingConnector, MessagingError, SharedTransport,
    Subscription, Transport,
};
