use serde::{Deserialize, Serialize};

/// Feature flags controlling optional parts of the complaint desk.
///
/// Loaded from `config.toml` at server startup and exposed to clients
/// via a server function. Missing fields fall back to [`FeatureFlags::default`],
/// which keeps the public dashboard and self-registration open and
/// telemetry off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureFlags {
    pub telemetry: bool,
    pub public_dashboard: bool,
    pub registration: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            telemetry: false,
            public_dashboard: true,
            registration: true,
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}
