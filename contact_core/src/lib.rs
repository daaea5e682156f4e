//! Core library for the contact form submission pipeline: client-side form
//! controller, server-side submission gateway, and the rate-limit store they
//! share the wire contract over.

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod rate_limit;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use form::{FormController, SubmitStatus, SubmitTransport, TransportError};
pub use handlers::create_routes;
pub use models::{ContactPayload, MessageResponse, SanitizedMessage, SubmissionDisposition};
pub use notify::{ContactNotifier, LogNotifier, SharedNotifier};
pub use rate_limit::{start_sweep_task, InMemoryRateLimitStore, RateLimitDecision, RateLimitStore};
pub use validation::{validate_payload, ValidationResult};

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    pub notifier: SharedNotifier,
}

impl Default for AppState {
    fn default() -> Self {
        let rate_limit = config::RateLimitConfig::default();
        Self {
            app_name: "Contact Gateway".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            rate_limiter: Arc::new(InMemoryRateLimitStore::new(
                rate_limit.max_requests,
                rate_limit.window(),
            )),
            notifier: Arc::new(LogNotifier),
        }
    }
}

impl AppState {
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimitStore>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn with_notifier(mut self, notifier: SharedNotifier) -> Self {
        self.notifier = notifier;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(middleware::cors::cors_layer_from_config(&config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
