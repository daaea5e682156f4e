//! Main entry point for the contact gateway binary

use anyhow::Result;
use contact_core::{
    create_app_with_config, run_server, start_sweep_task, AppConfig, AppState,
    InMemoryRateLimitStore, LogNotifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!(
        "Rate limit: {} requests per {}s window",
        config.rate_limit.max_requests, config.rate_limit.window_seconds
    );

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let rate_limiter = Arc::new(InMemoryRateLimitStore::new(
        config.rate_limit.max_requests,
        config.rate_limit.window(),
    ));

    let state = AppState::default()
        .with_rate_limiter(rate_limiter.clone())
        .with_notifier(Arc::new(LogNotifier));

    info!("App: {} v{}", state.app_name, state.version);

    // Housekeeping only; requests never touch this task.
    let sweep_handle = if config.rate_limit.enable {
        let handle = start_sweep_task(rate_limiter, config.rate_limit.sweep_interval());
        info!(
            "Started rate limit sweep task (every {}s)",
            config.rate_limit.sweep_interval_seconds
        );
        Some(handle)
    } else {
        None
    };

    let app = create_app_with_config(state, config);

    run_server(app, addr).await?;

    if let Some(handle) = sweep_handle {
        handle.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            format!(
                "{}={},tower_http=debug,axum=debug",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
