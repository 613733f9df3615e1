use serde::Serialize;
use serde_json::{Map, Value};

/// Chart format version produced by the builder.
pub const CHART_API_VERSION: &str = "v2";

/// In-memory packaged chart: metadata, decoded values and template files.
/// Built fresh for every install request and discarded afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub metadata: ChartMetadata,
    /// Decoded values.yaml as a JSON mapping.
    pub values: Value,
    pub templates: Vec<ChartFile>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChartMetadata {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub version: String,
    pub app_version: String,
    pub api_version: String,
}

/// A single named template file with raw byte content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl Serialize for ChartFile {
    // Templates serialize as name only; body bytes are not JSON-safe.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            metadata: ChartMetadata::default(),
            values: Value::Object(Map::new()),
            templates: Vec::new(),
        }
    }
}
