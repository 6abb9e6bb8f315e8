//! HTTP server for LinkShare.
//!
//! This crate exposes the share form and the listing page over HTTP and
//! delegates every rule to `linkshare_core`.

mod config;
mod error;
pub mod handlers;
mod middleware;
pub mod pages;

pub use config::{CliArgs, ServerConfig};
pub use error::PageError;
pub use handlers::AppState;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

/// Builds the application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/index_upload", get(handlers::handle_index_upload))
        .route(
            "/share",
            get(handlers::handle_share_form).post(handlers::handle_share_submit),
        )
        .route("/learn", get(handlers::handle_learn))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .with_state(state)
}

/// Binds the listener and serves until Ctrl-C.
///
/// # Errors
/// - Returns an error when the address cannot be bound or the server stops
///   abnormally.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("event=server_start module=server status=ok address={address}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped abnormally")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
