//! Install API DTOs

use serde::Deserialize;
use validator::Validate;

/// Optional request body for the install endpoint.
///
/// Everything here has a configured default; an empty body installs the
/// on-disk chart manifest as-is.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(default)]
pub struct InstallRequest {
    /// Explicit release name. Derived from the configured prefix and the
    /// current Unix timestamp when absent.
    #[validate(length(min = 1, max = 53))]
    pub name: Option<String>,
    /// Target namespace override.
    #[validate(length(min = 1, max = 63))]
    pub namespace: Option<String>,
    /// Values merged over the chart values (override wins).
    pub values: Option<serde_json::Value>,
}
