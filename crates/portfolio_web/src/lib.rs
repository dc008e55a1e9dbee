//! Server-rendered web apps: the Roman numeral form and the email directory.
//!
//! Both apps are plain axum routers so tests can drive them with
//! `tower::ServiceExt::oneshot`; the binaries add tracing and bind a port.

pub mod config;
pub mod directory;
pub mod email;
pub mod error;
pub mod roman;
pub mod secrets;
pub mod telemetry;
pub mod templates;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;

/// Binds `0.0.0.0:{port}` and serves `app` until ctrl-c or SIGTERM.
pub async fn serve(app: Router, port: u16) -> Result<(), AppError> {
    let address = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app.layer(TraceLayer::new_for_http()))
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
