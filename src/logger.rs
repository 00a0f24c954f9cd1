//! Logging setup: one fmt subscriber on stderr, installed once from `main`.
//!
//! The configured level is the default. `RUST_LOG`, when it holds at least one
//! valid directive, replaces it, which is how per-target tracing is turned on
//! (`RUST_LOG=relay_bot=trace,reqwest=debug`).

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber with `level` as the default filter.
pub fn init(level: LevelFilter) -> Result<(), AppError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Invalid `RUST_LOG` directives are dropped rather than failing startup.
fn filter_for(level: LevelFilter, rust_log: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_without_rust_log() {
        assert_eq!(filter_for(LevelFilter::DEBUG, None).to_string(), "debug");
        assert_eq!(filter_for(LevelFilter::WARN, Some("")).to_string(), "warn");
    }

    #[test]
    fn rust_log_directives_replace_the_default() {
        let filter = filter_for(LevelFilter::INFO, Some("relay_bot=trace"));
        assert_eq!(filter.to_string(), "relay_bot=trace");
    }

    #[test]
    fn garbage_rust_log_falls_back_to_configured_level() {
        let filter = filter_for(LevelFilter::INFO, Some("relay_bot=fake level,reqwest=lolwut"));
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn second_init_reports_logger_error() {
        // Whichever test installs first wins; any later call must fail cleanly.
        let _ = init(LevelFilter::INFO);
        match init(LevelFilter::INFO) {
            Err(AppError::Logger(msg)) => assert!(msg.contains("set subscriber")),
            other => panic!("expected logger error, got {other:?}"),
        }
    }
}
