use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Value};
use tracing::warn;

use crate::core::manifest::chart_manifest_entity::ChartManifest;

use super::chart_entity::{Chart, ChartFile, ChartMetadata, CHART_API_VERSION};

const DEFAULT_DESCRIPTION: &str = "Chart packaged from a ChartRelease manifest";
const DEFAULT_TYPE: &str = "application";
const DEFAULT_VERSION: &str = "0.0.1";
const DEFAULT_APP_VERSION: &str = "latest";

/// Build a chart from a manifest record.
///
/// Deliberately lenient: every decode or parse failure is logged and the
/// affected field is left zero-valued, so a corrupt manifest yields a
/// partial chart rather than an error. Validation decides afterwards
/// whether the result is installable.
pub fn build_chart(manifest: &ChartManifest) -> Chart {
    if !manifest.is_expected_kind() {
        warn!(
            "Manifest '{}' has unexpected apiVersion/kind ({}/{})",
            manifest.metadata.name, manifest.api_version, manifest.kind
        );
    }

    let spec = &manifest.spec;
    let metadata = ChartMetadata {
        name: manifest.metadata.name.clone(),
        description: spec
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        chart_type: DEFAULT_TYPE.to_string(),
        version: spec
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        app_version: spec
            .app_version
            .clone()
            .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
        api_version: CHART_API_VERSION.to_string(),
    };

    let values = decode_values(&spec.values);

    let templates = spec
        .templates
        .iter()
        .map(|t| ChartFile {
            name: t.name.clone(),
            data: BASE64.decode(&t.b64_content).unwrap_or_else(|err| {
                warn!("Failed to base64 decode template '{}': {err}", t.name);
                Vec::new()
            }),
        })
        .collect();

    Chart {
        metadata,
        values,
        templates,
    }
}

fn decode_values(encoded: &str) -> Value {
    let empty = || Value::Object(Map::new());

    if encoded.trim().is_empty() {
        return empty();
    }

    let bytes = match BASE64.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to base64 decode values.yaml: {err}");
            return empty();
        }
    };

    match serde_yaml::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(Value::Null) => empty(),
        Ok(other) => {
            warn!("values.yaml did not decode to a mapping (got {other})");
            empty()
        }
        Err(err) => {
            warn!("Failed to parse values.yaml: {err}");
            empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::chart_manifest_entity::{
        ManifestMetadata, ManifestSpec, TemplateSpec, MANIFEST_API_VERSION, MANIFEST_KIND,
    };
    use base64::Engine as _;
    use serde_json::json;

    fn manifest_with(values: &str, templates: Vec<TemplateSpec>) -> ChartManifest {
        ChartManifest {
            api_version: MANIFEST_API_VERSION.to_string(),
            kind: MANIFEST_KIND.to_string(),
            metadata: ManifestMetadata {
                name: "demo".to_string(),
                namespace: "default".to_string(),
            },
            spec: ManifestSpec {
                values: values.to_string(),
                templates,
                ..Default::default()
            },
        }
    }

    fn b64(input: &str) -> String {
        BASE64.encode(input)
    }

    #[test]
    fn well_formed_manifest_yields_full_chart() {
        let manifest = manifest_with(
            &b64("replicas: 2\nimage: nginx\n"),
            vec![TemplateSpec {
                name: "templates/configmap.yaml".to_string(),
                b64_content: b64("kind: ConfigMap\n"),
            }],
        );

        let chart = build_chart(&manifest);
        assert_eq!(chart.metadata.name, "demo");
        assert_eq!(chart.metadata.version, "0.0.1");
        assert_eq!(chart.metadata.api_version, CHART_API_VERSION);
        assert_eq!(chart.values, json!({"replicas": 2, "image": "nginx"}));
        assert_eq!(chart.templates.len(), 1);
        assert_eq!(chart.templates[0].data, b"kind: ConfigMap\n");
    }

    #[test]
    fn spec_metadata_overrides_placeholders() {
        let mut manifest = manifest_with(&b64("a: 1\n"), vec![]);
        manifest.spec.version = Some("1.2.3".to_string());
        manifest.spec.app_version = Some("v9".to_string());
        manifest.spec.description = Some("custom".to_string());

        let chart = build_chart(&manifest);
        assert_eq!(chart.metadata.version, "1.2.3");
        assert_eq!(chart.metadata.app_version, "v9");
        assert_eq!(chart.metadata.description, "custom");
    }

    #[test]
    fn malformed_base64_values_yield_empty_mapping() {
        let manifest = manifest_with("%%%not-base64%%%", vec![]);
        let chart = build_chart(&manifest);
        assert_eq!(chart.values, json!({}));
    }

    #[test]
    fn malformed_yaml_values_yield_empty_mapping() {
        let manifest = manifest_with(&b64("{broken: [yaml"), vec![]);
        let chart = build_chart(&manifest);
        assert_eq!(chart.values, json!({}));
    }

    #[test]
    fn scalar_values_document_yields_empty_mapping() {
        let manifest = manifest_with(&b64("just-a-string"), vec![]);
        let chart = build_chart(&manifest);
        assert_eq!(chart.values, json!({}));
    }

    #[test]
    fn malformed_template_body_yields_empty_file() {
        let manifest = manifest_with(
            &b64("a: 1\n"),
            vec![TemplateSpec {
                name: "templates/broken.yaml".to_string(),
                b64_content: "!!!".to_string(),
            }],
        );

        let chart = build_chart(&manifest);
        assert_eq!(chart.templates.len(), 1);
        assert!(chart.templates[0].data.is_empty());
    }

    #[test]
    fn zero_valued_manifest_yields_zero_chart() {
        let chart = build_chart(&ChartManifest::default());
        assert!(chart.metadata.name.is_empty());
        assert_eq!(chart.values, json!({}));
        assert!(chart.templates.is_empty());
    }
}
