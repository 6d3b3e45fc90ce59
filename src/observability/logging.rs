//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level so a single run
//! can be made more verbose without editing the config file.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the filter: `RUST_LOG` if set, otherwise `level` for this crate
/// and `warn` for everything else.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if level.trim().is_empty() { DEFAULT_LOG_LEVEL } else { level.trim() };
        format!("warn,payroll_chain={level}").into()
    })
}

/// Install the global subscriber. Logs go to stderr; stdout carries
/// command output only.
pub fn init_logging(level: &str) {
    let result = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_levels() {
        for level in ["debug", "info", "", "  trace "] {
            let filter = env_filter(level);
            assert!(!filter.to_string().is_empty());
        }
    }
}
