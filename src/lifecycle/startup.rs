//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration before anything touches the network
//! - Connect messaging, subscribe termination signals, register listeners,
//!   connect persistence, in that order
//! - Bind the network listener last, whatever the dependency outcomes
//!
//! # Design Decisions
//! - Fail fast only on missing config, signal subscription and bind errors
//! - Dependency failures become `DependencyState` values, not errors
//! - Phases are awaited in sequence; only listener registrations overlap

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{self, ConfigError, ServiceConfig};
use crate::health::{self, DependencyState, ServiceHealth};
use crate::lifecycle::signals::{termination_signals, SignalStream};
use crate::messaging::listeners::order_listeners;
use crate::messaging::{
    Listener, ListenerRegistrar, MessagingConnector, RegistrationReport, SharedTransport,
};
use crate::net::{self, ListenerError};
use crate::persistence::{PersistenceConnector, SharedStore};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("network listener error: {0}")]
    Listener(#[from] ListenerError),

    #[error("failed to subscribe to termination signals: {0}")]
    Signals(#[source] io::Error),
}

/// Produces the termination signal stream.
pub type SignalSource = Box<dyn FnOnce() -> io::Result<SignalStream> + Send>;

/// Everything startup produced. Handed to the HTTP server and the shutdown
/// coordinator.
pub struct Started {
    pub config: ServiceConfig,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
    /// `None` when the NATS connect failed.
    pub transport: Option<SharedTransport>,
    /// `None` when the store connect failed.
    pub store: Option<SharedStore>,
    pub health: ServiceHealth,
    pub registrar: ListenerRegistrar,
    pub registrations: RegistrationReport,
    /// Subscribed right after the messaging phase; deliveries wait here until
    /// the shutdown coordinator polls.
    pub signals: SignalStream,
}

impl std::fmt::Debug for Started {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Started")
            .field("local_addr", &self.local_addr)
            .field("messaging", &self.health.messaging)
            .field("persistence", &self.health.persistence)
            .field("registrations", &self.registrations)
            .finish_non_exhaustive()
    }
}

/// Brings the service from process start to accepting traffic.
pub struct Bootstrap<M, P> {
    messaging: M,
    persistence: P,
    listeners: Vec<Arc<dyn Listener>>,
    bind_address: Option<String>,
    signals: SignalSource,
}

impl<M, P> Bootstrap<M, P>
where
    M: MessagingConnector,
    P: PersistenceConnector,
{
    /// Create a bootstrap with the default order listeners.
    pub fn new(messaging: M, persistence: P) -> Self {
        Self {
            messaging,
            persistence,
            listeners: order_listeners(),
            bind_address: None,
            signals: Box::new(termination_signals),
        }
    }

    /// Replace the termination signal source.
    pub fn with_signals<F>(mut self, source: F) -> Self
    where
        F: FnOnce() -> io::Result<SignalStream> + Send + 'static,
    {
        self.signals = Box::new(source);
        self
    }

    /// Replace the listener set.
    pub fn with_listeners(mut self, listeners: Vec<Arc<dyn Listener>>) -> Self {
        self.listeners = listeners;
        self
    }

    /// Override the bind address (tests bind port 0).
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = Some(address.into());
        self
    }

    /// Start using the process environment.
    pub async fn start_from_env(self) -> Result<Started, StartupError> {
        self.start(|key| std::env::var(key).ok()).await
    }

    /// Validate configuration read through `lookup`, then run every phase.
    pub async fn start<F>(self, lookup: F) -> Result<Started, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        tracing::info!("Orders service started");
        let config = config::load_with(lookup)?;
        self.start_with_config(config).await
    }

    /// Run every phase after validation.
    pub async fn start_with_config(self, mut config: ServiceConfig) -> Result<Started, StartupError> {
        if let Some(address) = self.bind_address {
            config.listener.bind_address = address;
        }

        // Messaging
        tracing::info!(
            cluster_id = %config.messaging.cluster_id,
            client_id = %config.messaging.client_id,
            "Attempting connection to NATS"
        );
        let connected = self.messaging.connect(&config.messaging).await;
        let messaging_state = DependencyState::observe(health::MESSAGING, &connected);
        let transport = match connected {
            Ok(transport) => {
                tracing::info!("Connected to NATS");
                Some(transport)
            }
            Err(e) => {
                tracing::error!(error = %e, "NATS failed to connect, continuing without messaging");
                None
            }
        };

        // Signals
        let signals = (self.signals)().map_err(StartupError::Signals)?;

        // Listeners
        let mut registrar =
            ListenerRegistrar::new(config.messaging.queue_group.clone(), self.listeners);
        let registrations = registrar.register_all(transport.as_ref()).await;

        // Persistence
        tracing::info!("Attempting connection to persistence store");
        let connected = self.persistence.connect(&config.persistence).await;
        let persistence_state = DependencyState::observe(health::PERSISTENCE, &connected);
        let store = match connected {
            Ok(store) => {
                tracing::info!(backend = store.backend(), "Connected to persistence store");
                Some(store)
            }
            Err(e) => {
                tracing::error!(error = %e, "Persistence store failed to connect, continuing without it");
                None
            }
        };

        let health = ServiceHealth {
            messaging: messaging_state,
            persistence: persistence_state,
        };
        if health.is_degraded() {
            tracing::warn!(unavailable = ?health.unavailable(), "Starting in degraded mode");
        }

        // Network
        let listener = net::bind(&config.listener).await?;
        let local_addr = listener.local_addr().map_err(ListenerError::from)?;
        tracing::info!(
            address = %local_addr,
            "Orders service listening on port {}",
            local_addr.port()
        );

        Ok(Started {
            config,
            listener,
            local_addr,
            transport,
            store,
            health,
            registrar,
            registrations,
            signals,
        })
    }
}
