use dioxus::prelude::*;
use shared_types::FeatureFlags;

#[cfg(feature = "server")]
pub(crate) mod auth;

mod session;
pub use session::*;

mod complaint;
pub use complaint::*;

/// Get the current feature flags. No auth required; flags are not sensitive.
#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}
