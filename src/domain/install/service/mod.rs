use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::api::dto::install_dto::InstallRequest;
use crate::config::Settings;
use crate::core::chart::builder::build_chart;
use crate::core::chart::chart_entity::ChartMetadata;
use crate::core::chart::validate::validate_chart;
use crate::core::client::kube_client::build_kube_client;
use crate::core::manifest::chart_manifest_entity::ChartManifest;
use crate::core::manifest::manifest_repository::{ManifestRepository, ManifestRepositoryImpl};
use crate::core::release::install::{
    install_release, prepare_release, release_name, PreparedRelease,
};
use crate::core::release::render::ReleaseRef;
use crate::core::release::values::coalesce;
use crate::errors::AppError;

/// What a successful install returns to the caller.
#[derive(Serialize, Debug, Clone)]
pub struct InstallOutcome {
    pub release: String,
    pub namespace: String,
    pub chart: String,
    pub chart_version: String,
    pub resources: Vec<String>,
    pub installed_at: DateTime<Utc>,
}

/// Install the configured chart manifest as a new release.
pub async fn install(settings: &Settings, req: InstallRequest) -> Result<InstallOutcome> {
    let repo = ManifestRepositoryImpl::new(settings.manifest_path.clone());
    let (prepared, metadata) = prepare_with_repo(settings, &repo, &req)?;

    info!(
        "Installing chart '{}' as release '{}' into '{}'",
        metadata.name, prepared.release.name, prepared.release.namespace
    );

    let client = build_kube_client(settings)
        .await
        .map_err(|err| AppError::K8sApiError(format!("{err:#}")))?;

    let resources = install_release(client, &prepared)
        .await
        .map_err(|err| AppError::K8sApiError(format!("{err:#}")))?;

    Ok(InstallOutcome {
        release: prepared.release.name,
        namespace: prepared.release.namespace,
        chart: metadata.name,
        chart_version: metadata.version,
        resources,
        installed_at: Utc::now(),
    })
}

/// Everything up to (but not including) cluster access: load, build,
/// validate, coalesce values, render. Kept separate so it is testable
/// without a cluster.
fn prepare_with_repo<R: ManifestRepository>(
    settings: &Settings,
    repo: &R,
    req: &InstallRequest,
) -> Result<(PreparedRelease, ChartMetadata)> {
    // Lenient load: a missing or unparseable manifest degrades to a
    // zero-valued record; validation below decides the outcome.
    let manifest = match repo.load() {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!("Failed to load chart manifest: {err:#}");
            ChartManifest::default()
        }
    };

    let chart = build_chart(&manifest);
    validate_chart(&chart).map_err(|err| AppError::ChartInvalid(format!("{err:#}")))?;

    let name = req
        .name
        .clone()
        .unwrap_or_else(|| release_name(&settings.release_prefix, Utc::now()));
    let namespace = req
        .namespace
        .clone()
        .or_else(|| non_empty(&manifest.metadata.namespace))
        .unwrap_or_else(|| settings.namespace.clone());

    let mut values = chart.values.clone();
    if let Some(secret) = &settings.pull_secret_b64 {
        coalesce(&mut values, json!({ "pullSecretB64": secret }));
    }
    if let Some(overrides) = req.values.clone() {
        coalesce(&mut values, overrides);
    }

    let release = ReleaseRef { name, namespace };
    let prepared = prepare_release(&chart, release, &values)
        .map_err(|err| AppError::RenderError(format!("{err:#}")))?;

    Ok((prepared, chart.metadata))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::chart_manifest_entity::{
        ManifestMetadata, ManifestSpec, TemplateSpec, MANIFEST_API_VERSION, MANIFEST_KIND,
    };
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use std::path::PathBuf;

    struct MockManifestRepository {
        manifest: Result<ChartManifest, String>,
    }

    impl ManifestRepository for MockManifestRepository {
        fn load(&self) -> Result<ChartManifest> {
            match &self.manifest {
                Ok(manifest) => Ok(manifest.clone()),
                Err(msg) => Err(anyhow::anyhow!(msg.clone())),
            }
        }
    }

    fn settings() -> Settings {
        Settings {
            listen_addr: "127.0.0.1:8090".to_string(),
            manifest_path: PathBuf::from("./crds/test/test-chart.yaml"),
            api_server: None,
            bearer_token: None,
            accept_invalid_certs: false,
            namespace: "default".to_string(),
            release_prefix: "chart".to_string(),
            pull_secret_b64: Some("c2VjcmV0".to_string()),
            log_dir: None,
        }
    }

    fn sample_manifest() -> ChartManifest {
        ChartManifest {
            api_version: MANIFEST_API_VERSION.to_string(),
            kind: MANIFEST_KIND.to_string(),
            metadata: ManifestMetadata {
                name: "demo".to_string(),
                namespace: "manifests".to_string(),
            },
            spec: ManifestSpec {
                values: BASE64.encode("replicas: 2\n"),
                templates: vec![TemplateSpec {
                    name: "templates/configmap.yaml".to_string(),
                    b64_content: BASE64.encode(
                        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {{ release.name }}-cm\ndata:\n  pullSecret: \"{{ values.pullSecretB64 }}\"\n  replicas: \"{{ values.replicas }}\"\n",
                    ),
                }],
                ..Default::default()
            },
        }
    }

    #[test]
    fn prepares_release_with_injected_pull_secret() {
        let repo = MockManifestRepository {
            manifest: Ok(sample_manifest()),
        };

        let (prepared, metadata) =
            prepare_with_repo(&settings(), &repo, &InstallRequest::default()).unwrap();

        assert_eq!(metadata.name, "demo");
        assert_eq!(prepared.release.namespace, "manifests");
        assert!(prepared.release.name.starts_with("chart-"));
        assert_eq!(prepared.objects.len(), 1);

        let data = prepared.objects[0].data["data"].clone();
        assert_eq!(data["pullSecret"], "c2VjcmV0");
        assert_eq!(data["replicas"], "2");
    }

    #[test]
    fn request_overrides_name_namespace_and_values() {
        let repo = MockManifestRepository {
            manifest: Ok(sample_manifest()),
        };
        let req = InstallRequest {
            name: Some("my-release".to_string()),
            namespace: Some("apps".to_string()),
            values: Some(json!({"replicas": 7, "pullSecretB64": "b3ZlcnJpZGU="})),
        };

        let (prepared, _) = prepare_with_repo(&settings(), &repo, &req).unwrap();

        assert_eq!(prepared.release.name, "my-release");
        assert_eq!(prepared.release.namespace, "apps");
        let data = prepared.objects[0].data["data"].clone();
        assert_eq!(data["replicas"], "7");
        assert_eq!(data["pullSecret"], "b3ZlcnJpZGU=");
    }

    #[test]
    fn unreadable_manifest_degrades_to_invalid_chart() {
        let repo = MockManifestRepository {
            manifest: Err("no such file".to_string()),
        };

        let err =
            prepare_with_repo(&settings(), &repo, &InstallRequest::default()).unwrap_err();
        match err.downcast::<AppError>() {
            Ok(AppError::ChartInvalid(_)) => {}
            other => panic!("expected ChartInvalid, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_values_still_prepare_when_templates_need_nothing() {
        let mut manifest = sample_manifest();
        manifest.spec.values = "%%%not-base64%%%".to_string();
        manifest.spec.templates[0].b64_content = BASE64.encode(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: static-cm\n",
        );

        let repo = MockManifestRepository {
            manifest: Ok(manifest),
        };

        let (prepared, _) =
            prepare_with_repo(&settings(), &repo, &InstallRequest::default()).unwrap();
        assert_eq!(prepared.objects.len(), 1);
        assert_eq!(prepared.objects[0].metadata.name.as_deref(), Some("static-cm"));
    }
}
