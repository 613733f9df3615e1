use std::path::Path;

use anyhow::{Context as _, Result};
use serde_json::Value;
use tera::{Context, Tera};
use tracing::{debug, warn};

use crate::core::chart::chart_entity::Chart;

/// Identity of the release being rendered, exposed to templates as
/// `release.name` / `release.namespace`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRef {
    pub name: String,
    pub namespace: String,
}

/// One rendered template body, tagged with its source file name.
#[derive(Debug, Clone)]
pub struct RenderedManifest {
    pub source: String,
    pub content: String,
}

/// Render every manifest template in the chart against the given values.
///
/// All UTF-8 template files are registered together so helpers can be
/// included or imported; only manifest files (`*.yaml` / `*.yml`, not
/// `_`-prefixed) produce output. Whitespace-only output is dropped.
pub fn render_chart(
    chart: &Chart,
    release: &ReleaseRef,
    values: &Value,
) -> Result<Vec<RenderedManifest>> {
    let mut sources = Vec::new();
    for template in &chart.templates {
        match std::str::from_utf8(&template.data) {
            Ok(body) => sources.push((template.name.clone(), body.to_string())),
            Err(_) => {
                warn!("Template '{}' is not UTF-8, skipping", template.name);
            }
        }
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(sources.clone())
        .context("Failed to compile chart templates")?;

    let mut context = Context::new();
    context.insert("values", values);
    context.insert(
        "release",
        &serde_json::json!({
            "name": release.name,
            "namespace": release.namespace,
        }),
    );
    context.insert(
        "chart",
        &serde_json::json!({
            "name": chart.metadata.name,
            "version": chart.metadata.version,
            "appVersion": chart.metadata.app_version,
        }),
    );

    let mut rendered = Vec::new();
    for (name, _) in &sources {
        if !is_manifest_source(name) {
            debug!("Skipping non-manifest template '{name}'");
            continue;
        }

        let output = tera
            .render(name, &context)
            .with_context(|| format!("Failed to render template '{name}'"))?;

        if output.trim().is_empty() {
            debug!("Template '{name}' rendered empty, dropping");
            continue;
        }

        rendered.push(RenderedManifest {
            source: name.clone(),
            content: output,
        });
    }

    Ok(rendered)
}

/// Manifest files are `*.yaml`/`*.yml`; `_`-prefixed files are helpers
/// available for include/import only.
fn is_manifest_source(name: &str) -> bool {
    let path = Path::new(name);
    let basename = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    if basename.starts_with('_') {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
