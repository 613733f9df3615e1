use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::chart_manifest_entity::ChartManifest;

/// Read and parse the chart manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<ChartManifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart manifest at {}", path.display()))?;

    let manifest: ChartManifest = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse chart manifest at {}", path.display()))?;

    debug!(
        "Loaded chart manifest '{}' ({} template(s))",
        manifest.metadata.name,
        manifest.spec.templates.len()
    );
    Ok(manifest)
}
