//! ServerBuilder for the booking back office

use super::host::ServerHost;
use super::router::build_booking_routes;
use crate::config::DeskConfig;
use crate::core::error::{ConfigError, DeskResult};
use crate::core::service::BookingApi;
use crate::storage::InMemoryBookingStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the booking HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_api(InMemoryBookingStore::from_seed(&config.seed))
///     .build()?;
/// ```
pub struct ServerBuilder {
    api: Option<Arc<dyn BookingApi>>,
    service_name: Option<String>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            service_name: None,
        }
    }

    /// A builder serving the in-memory store seeded from `config`
    pub fn from_config(config: &DeskConfig) -> Self {
        Self::new().with_api(InMemoryBookingStore::from_seed(&config.seed))
    }

    /// Set the API implementation (required)
    pub fn with_api(mut self, api: impl BookingApi + 'static) -> Self {
        self.api = Some(Arc::new(api));
        self
    }

    /// Share an API implementation with other owners, e.g. a test
    pub fn with_shared_api(mut self, api: Arc<dyn BookingApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Build the router with tracing and CORS layers
    pub fn build(self) -> DeskResult<Router> {
        let api = self.api.ok_or_else(|| ConfigError::ParseError {
            file: None,
            message: "a BookingApi is required; call .with_api()".to_string(),
        })?;

        let mut host = ServerHost::new(api);
        if let Some(name) = self.service_name {
            host = host.with_service_name(name);
        }

        let app = build_booking_routes(Arc::new(host));
        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve with graceful shutdown on SIGTERM or Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, "booking server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        },
    }
}
