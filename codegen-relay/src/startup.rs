//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers::{not_found, page::index, relay::generate};
use crate::services::providers::build_provider;
use crate::services::{ArtifactStore, GithubStore, TextProvider};
use axum::{
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::any::Any;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. Immutable; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub text_provider: Arc<dyn TextProvider>,
    pub artifact_store: Arc<dyn ArtifactStore>,
}

impl AppState {
    pub fn new(
        config: RelayConfig,
        text_provider: Arc<dyn TextProvider>,
        artifact_store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            text_provider,
            artifact_store,
        }
    }

    /// Wire the real Generation Service and GitHub clients from configuration.
    pub fn from_config(config: RelayConfig) -> Result<Self, AppError> {
        let text_provider = build_provider(&config.generation)
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;
        let artifact_store: Arc<dyn ArtifactStore> = Arc::new(
            GithubStore::new(config.github.clone())
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        );

        tracing::info!(
            provider = text_provider.name(),
            model = %config.generation.model,
            owner = %config.github.owner,
            repo = %config.github.repo,
            "Initialized relay clients"
        );

        Ok(Self::new(config, text_provider, artifact_store))
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = %detail, "Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error: {}", detail),
    )
        .into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(index)
                .head(not_found)
                .post(generate)
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::build_with_state(state).await
    }

    /// Bind the listener for an already wired state (port 0 = random port).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let address = state.config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("codegen-relay listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
