use std::collections::HashSet;
use std::path::Component;
use std::path::Path;

use anyhow::{bail, Result};

use super::chart_entity::{Chart, CHART_API_VERSION};

/// Structural chart validation, run after the lenient build step.
pub fn validate_chart(chart: &Chart) -> Result<()> {
    let name = &chart.metadata.name;
    if name.is_empty() {
        bail!("chart name is empty");
    }
    if !is_dns_label(name) {
        bail!("chart name '{name}' must be a lowercase DNS-1123 label");
    }
    if chart.metadata.version.is_empty() {
        bail!("chart version is empty");
    }
    if chart.metadata.api_version != CHART_API_VERSION {
        bail!(
            "unsupported chart apiVersion '{}'",
            chart.metadata.api_version
        );
    }
    if !chart.values.is_object() {
        bail!("chart values must be a mapping");
    }
    if chart.templates.is_empty() {
        bail!("chart has no templates");
    }

    let mut seen = HashSet::new();
    for template in &chart.templates {
        if template.name.is_empty() {
            bail!("chart contains a template with an empty name");
        }
        if !is_safe_relative_path(&template.name) {
            bail!("template name '{}' escapes the chart root", template.name);
        }
        if !seen.insert(template.name.as_str()) {
            bail!("duplicate template name '{}'", template.name);
        }
    }

    Ok(())
}

fn is_dns_label(name: &str) -> bool {
    name.len() <= 63
        && name.bytes().next().is_some_and(|b| b.is_ascii_alphanumeric())
        && name.bytes().last().is_some_and(|b| b.is_ascii_alphanumeric())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_safe_relative_path(name: &str) -> bool {
    let path = Path::new(name);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
}
