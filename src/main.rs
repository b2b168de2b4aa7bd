// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use casting_agency_server::{
    api::router,
    auth::AuthGuard,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    store::InMemoryStore,
};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How long in-flight requests get to finish after Ctrl-C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to install rustls crypto provider")]
    CryptoProvider,

    #[error("failed to load TLS certificate or key: {0}")]
    Tls(#[source] std::io::Error),

    #[error("failed to build JWKS HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Casting Agency server stopped");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| StartupError::CryptoProvider)?;

    let guard = AuthGuard::new(&config.auth)?;
    info!(
        jwks_url = %config.auth.jwks_url,
        issuer = %config.auth.issuer,
        audience = %config.auth.audience,
        algorithms = ?config.auth.allowed_algorithms,
        "Authentication configured"
    );

    // Warm the key cache; requests refetch on demand if this fails.
    if let Err(e) = guard.key_set().refresh().await {
        warn!(error = %e, "Identity provider keys not loaded at startup");
    }

    let app = router(AppState::new(InMemoryStore::new(), guard));
    let addr = config.bind_addr;

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    match config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .map_err(StartupError::Tls)?;
            info!(%addr, "Casting Agency server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            info!(%addr, "Casting Agency server listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(StartupError::Serve)
        }
    }
}

async fn shutdown_signal(handle: Handle<std::net::SocketAddr>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
