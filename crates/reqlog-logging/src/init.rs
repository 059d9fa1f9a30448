//! Internal diagnostics initialization
//!
//! The façade reports its own problems (records dropped because the sink
//! failed, an unreadable `.env` file) through `tracing` on `reqlog::*`
//! targets. This module installs the process-wide subscriber that receives
//! them, on stderr so it never mixes with record output on stdout. Hosts
//! that already run a tracing subscriber can skip `init` and those reports
//! flow into theirs; with no subscriber at all they are dropped silently.

use std::sync::Once;

use reqlog_core_types::schema::ENV_PRODUCTION;
use tracing_subscriber::EnvFilter;

/// Diagnostics profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable diagnostics, debug and up
    Development,
    /// JSON diagnostics, warnings and up
    Production,
    /// Routed through the test harness' captured output
    Test,
}

impl Profile {
    pub fn for_environment(environment: &str) -> Self {
        if environment == ENV_PRODUCTION {
            Profile::Production
        } else {
            Profile::Development
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the diagnostics subscriber
///
/// Only the first call has an effect. `RUST_LOG` overrides the profile's
/// default filter. If another global subscriber is already installed it is
/// left in place.
///
/// # Example
///
/// ```
/// use reqlog_logging::{init, Profile};
///
/// init(Profile::Test);
/// init(Profile::Test);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("reqlog=debug")),
                )
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("reqlog=warn")),
                )
                .try_init(),
            Profile::Test => tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(EnvFilter::new("reqlog=trace"))
                .try_init(),
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        // Multiple calls should not panic
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Development);
    }

    #[test]
    fn test_profile_for_environment() {
        assert_eq!(Profile::for_environment("production"), Profile::Production);
        assert_eq!(Profile::for_environment("development"), Profile::Development);
        assert_eq!(Profile::for_environment("staging"), Profile::Development);
    }
}
