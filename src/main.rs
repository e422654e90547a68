//! Orders service entry point.
//!
//! # Startup Sequence
//!
//! ```text
//!   env vars ──▶ validate ──▶ NATS connect ──▶ register listeners
//!                  │              │ (failure tolerated)     │
//!                  ▼              ▼                          ▼
//!                fatal      SIGINT/SIGTERM stream    ticket:created
//!                                 │                   ticket:updated
//!                                 │                   expiration:complete
//!                                 ▼
//!   store connect (failure tolerated) ──▶ bind :3000 ──▶ serve
//!
//!   Shutdown: signal → close NATS → close observed → exit(0)
//!             NATS closed on its own → exit(0)
//! ```

use clap::Parser;

use orders_service::config::{LogFormat, ObservabilityConfig};
use orders_service::http::{AppState, HttpServer};
use orders_service::lifecycle::{Bootstrap, ShutdownCoordinator, Started};
use orders_service::messaging::nats::NatsConnector;
use orders_service::observability::{logging, metrics};
use orders_service::persistence::MongoConnector;

/// Operator flags. Required service settings come from the environment.
#[derive(Debug, Parser)]
#[command(name = "orders-service", version, about = "Orders service")]
struct Cli {
    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Prometheus scrape address, e.g. 0.0.0.0:9090.
    #[arg(long, env = "METRICS_ADDRESS")]
    metrics_address: Option<String>,
}

impl Cli {
    fn observability(&self) -> ObservabilityConfig {
        ObservabilityConfig {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            metrics_address: self.metrics_address.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let observability = Cli::parse().observability();
    logging::init_logging(&observability);

    if let Some(address) = &observability.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %address,
                "Failed to parse metrics address"
            ),
        }
    }

    let Started {
        listener,
        transport,
        store,
        health,
        registrar: _registrar,
        signals,
        ..
    } = Bootstrap::new(NatsConnector::new(), MongoConnector::new())
        .start_from_env()
        .await?;

    let coordinator = ShutdownCoordinator::new(transport.clone());
    let server = HttpServer::new(AppState::new(health, store, transport));

    tokio::select! {
        served = server.run(listener) => {
            served?;
            Ok(())
        }
        _ = coordinator.run(signals) => {
            std::process::exit(0);
        }
    }
}
