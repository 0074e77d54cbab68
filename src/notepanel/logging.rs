//! Logging setup.
//!
//! Logs go to stderr so they never mix with listings on stdout. `RUST_LOG`
//! takes precedence over the configured level.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::{Error, ErrorKind, Result};

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &Config) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error {
            kind: ErrorKind::Config,
            desc: format!("invalid log level `{}`", config.log_level),
            detail: Some(e.to_string()),
        })?;

    let file = match config.log_file {
        Some(ref path) => Some(Arc::new(OpenOptions::new().create(true).append(true).open(path)?)),
        None => None,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init only fails when a subscriber is already set
    if config.log_json {
        let stderr_layer = fmt::layer().json().with_writer(std::io::stderr);
        let file_layer = file.map(|f| fmt::layer().json().with_ansi(false).with_writer(f));
        let _ = registry.with(stderr_layer).with(file_layer).try_init();
    } else {
        let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
        let file_layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(f));
        let _ = registry.with(stderr_layer).with(file_layer).try_init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = Config::default();
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
