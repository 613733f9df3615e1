use anyhow::{Context, Result};
use kube::{Client, Config};
use tracing::debug;

use crate::config::Settings;

/// Creates a Kubernetes client for the configured cluster endpoint.
///
/// With `CHARTD_K8S_API_URL` set, the client talks to that API server
/// with the configured bearer token and TLS policy. Otherwise the
/// configuration is inferred (in-cluster service account or local
/// kubeconfig).
pub async fn build_kube_client(settings: &Settings) -> Result<Client> {
    let config = match &settings.api_server {
        Some(api_server) => {
            debug!("Using configured API server {api_server}");
            let cluster_url = api_server
                .parse::<http::Uri>()
                .with_context(|| format!("Invalid K8s API URL: {api_server}"))?;

            let mut config = Config::new(cluster_url);
            config.default_namespace = settings.namespace.clone();
            config.accept_invalid_certs = settings.accept_invalid_certs;
            if let Some(token) = &settings.bearer_token {
                config.auth_info.token = Some(token.clone().into());
            }
            config
        }
        None => {
            debug!("Inferring Kubernetes client configuration");
            let mut config = Config::infer()
                .await
                .context("Failed to infer Kubernetes configuration")?;
            if settings.accept_invalid_certs {
                config.accept_invalid_certs = true;
            }
            config
        }
    };

    let client = Client::try_from(config).context("Failed to build Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");
    Ok(client)
}
