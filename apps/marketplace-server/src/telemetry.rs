// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing initialization.
//!
//! The filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
//!
//! ```bash
//! RUST_LOG=debug marketplace-server
//! RUST_LOG=marketplace_server=trace,tower_http=info LOG_FORMAT=json marketplace-server
//! ```

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

pub const DEFAULT_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to initialize tracing: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    let env_filter = create_env_filter()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false).with_level(true))
            .try_init()?,
    }

    Ok(())
}

fn create_env_filter() -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
