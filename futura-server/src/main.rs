//! futura-server service entry point.

use anyhow::Result;
use futura_common::config::Config;
use futura_common::logging::init_logging;
use futura_server::{build_router, AppState, GeminiProvider, Provider};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_with_env()?;
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Futura Server v{}", env!("CARGO_PKG_VERSION"));

    // A missing API key must not crash the process; chat requests are
    // answered with the configured-error response instead.
    let provider: Option<Arc<dyn Provider>> = match GeminiProvider::from_config(&config.gemini) {
        Some(p) => Some(Arc::new(p)),
        None => {
            tracing::error!(
                "No Gemini API key found (set GEMINI_API_KEY); chat requests will be rejected"
            );
            None
        }
    };

    let state = AppState::new(provider, config.gemini.model.clone());
    let app = build_router(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
