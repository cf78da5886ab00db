// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use marketplace_server::{
    api::router,
    auth::TokenCodec,
    config::Config,
    state::AppState,
    store::InMemoryStore,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Tracing is not up yet, so configuration errors go to stderr.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(config.log_format) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        access_ttl_hours = config.auth.access_ttl.num_hours(),
        refresh_ttl_hours = config.auth.refresh_ttl.num_hours(),
        "token lifetimes configured"
    );

    let codec = TokenCodec::new(config.auth.clone())?;
    let state = AppState::new(InMemoryStore::new(), codec);

    if let Some(seed) = &config.seed_admin {
        let admin = state.seed_admin(seed).await?;
        tracing::info!(user_id = admin.id, "bootstrap admin ready");
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "marketplace server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
