use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use kube::api::DynamicObject;
use kube::Client;
use tracing::info;

use crate::core::chart::chart_entity::Chart;
use crate::core::client::apply::{apply_object, parse_manifests, run_discovery, FIELD_MANAGER};

use super::render::{render_chart, ReleaseRef};

pub const INSTANCE_LABEL: &str = "app.kubernetes.io/instance";
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Derive a release name from the configured prefix and a timestamp.
/// Two calls within the same second produce the same name.
pub fn release_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, now.timestamp())
}

/// Rendered, parsed and release-labeled objects, ready to be applied.
#[derive(Debug)]
pub struct PreparedRelease {
    pub release: ReleaseRef,
    pub objects: Vec<DynamicObject>,
}

/// Render the chart and turn the output into labeled dynamic objects.
/// Pure with respect to the cluster; all network work happens in
/// [`install_release`].
pub fn prepare_release(
    chart: &Chart,
    release: ReleaseRef,
    values: &serde_json::Value,
) -> Result<PreparedRelease> {
    let rendered = render_chart(chart, &release, values)?;

    let mut objects = Vec::new();
    for manifest in &rendered {
        let docs = parse_manifests(&manifest.content)
            .with_context(|| format!("in template '{}'", manifest.source))?;
        objects.extend(docs);
    }

    for obj in &mut objects {
        label_object(obj, &release.name);
    }

    Ok(PreparedRelease { release, objects })
}

/// Apply every prepared object against the cluster in order.
pub async fn install_release(client: Client, prepared: &PreparedRelease) -> Result<Vec<String>> {
    let discovery = run_discovery(client.clone()).await?;

    let mut applied = Vec::with_capacity(prepared.objects.len());
    for obj in &prepared.objects {
        let id = apply_object(&client, &discovery, obj, &prepared.release.namespace).await?;
        applied.push(id);
    }

    info!(
        "Installed release '{}' into '{}' ({} object(s))",
        prepared.release.name,
        prepared.release.namespace,
        applied.len()
    );
    Ok(applied)
}

fn label_object(obj: &mut DynamicObject, release: &str) {
    let labels = obj.metadata.labels.get_or_insert_with(Default::default);
    labels.insert(INSTANCE_LABEL.to_string(), release.to_string());
    labels.insert(MANAGED_BY_LABEL.to_string(), FIELD_MANAGER.to_string());
}
