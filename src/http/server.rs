//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the service's handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve on the listener bound at startup
//! - Expose dependency availability to the application layer
//!
//! # Design Decisions
//! - Degraded dependencies are reported, not hidden: the health endpoint
//!   answers 503 and handlers needing a missing dependency reject with 503
//! - Unknown routes answer with a JSON 404

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::health::{self, ServiceHealth};
use crate::http::request::MakeRequestUuidV4;
use crate::messaging::SharedTransport;
use crate::persistence::SharedStore;

/// Health endpoint path.
pub const HEALTH_PATH: &str = "/api/orders/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    health: Arc<ServiceHealth>,
    store: Option<SharedStore>,
    transport: Option<SharedTransport>,
}

impl AppState {
    pub fn new(
        health: ServiceHealth,
        store: Option<SharedStore>,
        transport: Option<SharedTransport>,
    ) -> Self {
        Self {
            health: Arc::new(health),
            store,
            transport,
        }
    }

    pub fn health(&self) -> &ServiceHealth {
        &self.health
    }

    /// The store, or a 503 rejection when it never connected.
    pub fn require_store(&self) -> Result<SharedStore, DependencyUnavailable> {
        self.store.clone().ok_or(DependencyUnavailable {
            dependency: health::PERSISTENCE,
        })
    }

    /// The messaging handle, or a 503 rejection when it never connected.
    pub fn require_messaging(&self) -> Result<SharedTransport, DependencyUnavailable> {
        self.transport.clone().ok_or(DependencyUnavailable {
            dependency: health::MESSAGING,
        })
    }
}

/// A handler needed a dependency that is down.
#[derive(Debug, Error)]
#[error("{dependency} unavailable")]
pub struct DependencyUnavailable {
    pub dependency: &'static str,
}

impl IntoResponse for DependencyUnavailable {
    fn into_response(self) -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "errors": [{ "message": self.to_string() }] })),
        )
            .into_response()
    }
}

/// HTTP server for the orders service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over `state`.
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health_handler))
            .fallback(not_found)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router).await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.health();
    let status = if health.is_degraded() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(json!({
            "status": if health.is_degraded() { "degraded" } else { "ok" },
            "messaging": health.messaging,
            "persistence": health.persistence,
        })),
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "errors": [{ "message": "Not Found" }] })),
    )
}
