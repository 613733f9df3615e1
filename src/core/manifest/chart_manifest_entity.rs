use serde::{Deserialize, Serialize};

/// API version the service knows how to interpret.
pub const MANIFEST_API_VERSION: &str = "charts.chartd.dev/v1alpha1";
/// Expected resource kind.
pub const MANIFEST_KIND: &str = "ChartRelease";

/// On-disk custom-resource record describing a chart to install.
///
/// Values and template bodies are carried base64-encoded so the manifest
/// stays a plain YAML document regardless of template contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: ManifestMetadata,
    pub spec: ManifestSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestMetadata {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestSpec {
    /// Base64-encoded values.yaml text.
    pub values: String,
    pub templates: Vec<TemplateSpec>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub app_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateSpec {
    pub name: String,
    pub b64_content: String,
}

impl ChartManifest {
    /// True when apiVersion/kind identify a record this service owns.
    /// Mismatches are tolerated downstream; this only feeds a warning.
    pub fn is_expected_kind(&self) -> bool {
        self.api_version == MANIFEST_API_VERSION && self.kind == MANIFEST_KIND
    }
}
