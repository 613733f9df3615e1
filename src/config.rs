use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};

/// Runtime settings, loaded once at startup from the environment.
///
/// Every connection parameter the service uses is configurable here;
/// nothing is baked into the handlers.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Path of the chart manifest re-read on every install request.
    pub manifest_path: PathBuf,
    /// Kubernetes API server URL. When unset the client config is
    /// inferred (in-cluster service account or local kubeconfig).
    pub api_server: Option<String>,
    /// Bearer token used against a custom API server.
    pub bearer_token: Option<String>,
    /// Skip TLS certificate verification on the outbound client.
    /// Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
    /// Namespace releases are installed into.
    pub namespace: String,
    /// Prefix for derived release names.
    pub release_prefix: String,
    /// Image pull secret injected into chart values as `pullSecretB64`.
    pub pull_secret_b64: Option<String>,
    /// Directory for rotated log files; stdout-only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let accept_invalid_certs = match get("CHARTD_K8S_INSECURE_SKIP_TLS_VERIFY") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => bail!(
                    "Invalid CHARTD_K8S_INSECURE_SKIP_TLS_VERIFY value: {other}"
                ),
            },
        };

        Ok(Self {
            listen_addr: get("CHARTD_LISTEN_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8090".to_string()),
            manifest_path: get("CHARTD_MANIFEST_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./crds/test/test-chart.yaml")),
            api_server: get("CHARTD_K8S_API_URL"),
            bearer_token: get("CHARTD_K8S_BEARER_TOKEN"),
            accept_invalid_certs,
            namespace: get("CHARTD_NAMESPACE").unwrap_or_else(|| "default".to_string()),
            release_prefix: get("CHARTD_RELEASE_PREFIX")
                .unwrap_or_else(|| "chart".to_string()),
            pull_secret_b64: get("CHARTD_PULL_SECRET_B64"),
            log_dir: get("CHARTD_LOG_DIR").map(PathBuf::from),
        })
    }
}
