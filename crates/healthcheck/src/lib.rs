// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP health-check service for the collector.
//!
//! - GET `<path>` (default `/`) - the aggregate health snapshot as JSON, with
//!   the response code derived from the overall status

pub mod error;
pub mod extension;
mod server;

use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use pulse_config::health::HealthCheckSettings;
use pulse_status::Aggregator;

pub use server::http_status_for;

/// Shared state for the health-check HTTP server.
#[derive(Clone)]
pub(crate) struct AppState {
    /// The aggregator for querying the current health snapshot.
    pub(crate) aggregator: Arc<Aggregator>,
}

/// Builds the router serving the health-check handler at the given path.
#[must_use]
pub fn router(path: &str, aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route(path, get(server::serve_health))
        .with_state(AppState { aggregator })
}

/// Validates the settings and binds the health-check listener.
pub async fn bind(settings: &HealthCheckSettings) -> Result<TcpListener, Error> {
    settings.validate()?;

    // Parse the configured bind address.
    let addr = settings
        .endpoint
        .parse::<SocketAddr>()
        .map_err(|e| Error::InvalidEndpoint {
            endpoint: settings.endpoint.clone(),
            details: format!("{e}"),
        })?;

    // Bind the TCP listener.
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::BindFailed {
            endpoint: addr.to_string(),
            details: format!("{e}"),
        })?;

    tracing::info!(
        endpoint = %addr,
        path = %settings.path,
        "health check server listening"
    );

    Ok(listener)
}

/// Serves the health-check handler on an already-bound listener until
/// shutdown is requested.
pub async fn serve(
    listener: TcpListener,
    path: &str,
    aggregator: Arc<Aggregator>,
    cancel: CancellationToken,
) -> Result<(), Error> {
    let endpoint = listener
        .local_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_owned());
    let app = router(path, aggregator);

    // Start serving requests, with graceful shutdown on cancellation.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(|e| Error::ServerError {
            endpoint,
            details: format!("{e}"),
        })
}

/// Runs the health-check HTTP server until shutdown is requested.
pub async fn run(
    settings: HealthCheckSettings,
    aggregator: Arc<Aggregator>,
    cancel: CancellationToken,
) -> Result<(), Error> {
    let listener = bind(&settings).await?;
    serve(listener, &settings.path, aggregator, cancel).await
}
