use anyhow::{anyhow, bail, Context, Result};
use kube::api::{Api, DynamicObject, Patch, PatchParams};
use kube::core::GroupVersionKind;
use kube::discovery::{Discovery, Scope};
use kube::{Client, ResourceExt};
use serde::Deserialize;
use tracing::debug;

/// Field manager recorded by server-side apply.
pub const FIELD_MANAGER: &str = "chartd";

/// Parse rendered multi-document YAML into dynamic objects.
/// Empty documents are skipped.
pub fn parse_manifests(rendered: &str) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();

    for document in serde_yaml::Deserializer::from_str(rendered) {
        let value = serde_yaml::Value::deserialize(document)
            .context("Failed to parse rendered manifest document")?;
        if value.is_null() {
            continue;
        }
        let obj: DynamicObject = serde_yaml::from_value(value)
            .context("Rendered document is not a Kubernetes object")?;
        objects.push(obj);
    }

    Ok(objects)
}

/// Run API discovery once per install so arbitrary kinds (CRDs included)
/// can be resolved to their REST mapping.
pub async fn run_discovery(client: Client) -> Result<Discovery> {
    Discovery::new(client)
        .run()
        .await
        .context("Kubernetes API discovery failed")
}

/// Server-side apply one object against the cluster. Returns `Kind/name`.
pub async fn apply_object(
    client: &Client,
    discovery: &Discovery,
    obj: &DynamicObject,
    default_namespace: &str,
) -> Result<String> {
    let types = obj
        .types
        .as_ref()
        .ok_or_else(|| anyhow!("rendered object has no apiVersion/kind"))?;
    let gvk = GroupVersionKind::try_from(types)
        .with_context(|| format!("invalid apiVersion '{}'", types.api_version))?;

    let name = obj.name_any();
    if name.is_empty() {
        bail!("rendered {} object has no metadata.name", gvk.kind);
    }

    let (resource, caps) = discovery.resolve_gvk(&gvk).ok_or_else(|| {
        anyhow!(
            "API server does not serve {} {}",
            gvk.api_version(),
            gvk.kind
        )
    })?;

    let api: Api<DynamicObject> = if caps.scope == Scope::Namespaced {
        let namespace = obj
            .namespace()
            .unwrap_or_else(|| default_namespace.to_string());
        Api::namespaced_with(client.clone(), &namespace, &resource)
    } else {
        Api::all_with(client.clone(), &resource)
    };

    let params = PatchParams::apply(FIELD_MANAGER).force();
    api.patch(&name, &params, &Patch::Apply(obj))
        .await
        .with_context(|| format!("Failed to apply {}/{}", gvk.kind, name))?;

    debug!("Applied {}/{}", gvk.kind, name);
    Ok(format!("{}/{}", gvk.kind, name))
}
