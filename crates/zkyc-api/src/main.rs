//! # zkyc-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the commitment API.
//! Binds to configurable port (default 3000).

use anyhow::Context;
use zkyc_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let handle = zkyc_api::middleware::metrics::install_recorder()
        .context("failed to install Prometheus recorder")?;
    let state = zkyc_api::bootstrap::bootstrap(&config)
        .context("failed to connect ledger")?
        .with_metrics(handle);

    let app = zkyc_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(ledger = %config.ledger, "zKYC API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Structured tracing: `RUST_LOG` filter (default `info`), JSON when
/// `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
