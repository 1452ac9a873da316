use shared_types::{AppConfig, FeatureFlags};
use std::sync::OnceLock;
use std::time::Duration;

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

const DEFAULT_FEED_POLL_TIMEOUT_SECS: u64 = 25;

/// Read `config.toml`, parse feature flags, and store them in the global
/// `OnceLock`. Only the first call has effect.
///
/// A missing or unparseable file falls back to `FeatureFlags::default()`.
pub fn load_feature_flags() {
    FLAGS.get_or_init(|| read_flags(CONFIG_PATH));
}

fn read_flags(path: &str) -> FeatureFlags {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                tracing::info!(flags = ?config.features, "feature flags loaded");
                config.features
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "could not parse config, using default flags");
                FeatureFlags::default()
            }
        },
        Err(e) => {
            tracing::warn!(path, error = %e, "config not found, using default flags");
            FeatureFlags::default()
        }
    }
}

/// Get the loaded feature flags, or the defaults if `load_feature_flags()`
/// has not run (server functions in tests).
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: OnceLock<FeatureFlags> = OnceLock::new();
    FLAGS
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(FeatureFlags::default))
}

/// How long a feed long-poll waits for a change (`FEED_POLL_TIMEOUT_SECS`).
pub fn feed_poll_timeout() -> Duration {
    let secs = std::env::var("FEED_POLL_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_FEED_POLL_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
