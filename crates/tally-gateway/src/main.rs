//! Tally gateway: stateless counter service over HTTP.
//!
//! - POST /increment, /decrement, /value with `{"value": n}`
//! - GET /reset, GET /
//! - /healthz, /readyz, /metrics
//! - SIGINT/SIGTERM trigger a bounded graceful drain

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use tally_core::error::Result;
use tally_gateway::{app_state::AppState, config, router, server};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "tally-gateway exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // An explicit path must exist; the default one may be absent.
    let cfg = match std::env::var(config::CONFIG_ENV) {
        Ok(path) => config::load_from_file(&path)?,
        Err(_) => config::load_or_default(config::DEFAULT_CONFIG_PATH)?,
    };

    let state = AppState::new(cfg);
    let app = router::build_router(state.clone());
    let server = server::Server::bind(state).await?;

    let cancel = server.cancel_token();
    tokio::spawn(async move {
        server::shutdown_signal().await;
        cancel.cancel();
    });

    tracing::info!(listen = %server.local_addr()?, "tally-gateway starting");
    server.run(app).await?;
    tracing::info!("tally-gateway stopped");
    Ok(())
}
