//! Topology record definitions.
//!
//! Raw entries mirror the keys of a CML2 YAML export and are deserialized
//! leniently: every key is optional, and identifier-like keys accept any
//! scalar. The public records are what the builder hands to renderers.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::node_config::NodeConfig;

/// Errors that abort the construction of a topology model
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// A link references a node or interface that does not exist
    #[error("Node with ID '{node_id}' not found.")]
    NotFound { node_id: String },

    #[error("Topology has no 'lab' section")]
    MissingLab,

    #[error("Topology 'lab' section has no '{field}' key")]
    MissingLabField { field: &'static str },

    #[error("Invalid entry {index} in '{section}': {source}")]
    InvalidEntry {
        section: &'static str,
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Section '{section}' must be a sequence")]
    InvalidSection { section: &'static str },
}

/// A node entry of the `nodes` section
#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub node_definition: Option<String>,
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub y: Option<Value>,
    /// Kept verbatim; entries are only read when a link resolves a slot
    #[serde(default)]
    pub interfaces: Option<Value>,
    #[serde(default)]
    pub boot_disk_size: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image_definition: Option<String>,
    #[serde(default)]
    pub ram: Option<Value>,
    #[serde(default)]
    pub cpus: Option<Value>,
    #[serde(default)]
    pub cpu_limit: Option<Value>,
    #[serde(default)]
    pub data_volume: Option<Value>,
    /// Absent configuration means an empty one; an explicit null is kept
    #[serde(default = "empty_configuration")]
    pub configuration: Value,
    #[serde(default)]
    pub tags: Option<Value>,
}

/// A link entry of the `links` section
#[derive(Debug, Deserialize)]
pub(crate) struct RawLink {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub n1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub n2: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub i1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub i2: Option<String>,
}

/// A lab node, with every attribute copied verbatim from the export
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Node identifier (`id`), unique within a lab
    pub id: Option<String>,
    /// Display name (`label`)
    pub name: Option<String>,
    pub definition: Option<String>,
    pub x: Option<Value>,
    pub y: Option<Value>,
    /// Interface list (`interfaces`), copied verbatim
    pub interfaces: Option<Value>,
    pub boot_disk_size: Option<Value>,
    pub image_definition: Option<String>,
    pub ram: Option<Value>,
    pub cpus: Option<Value>,
    pub cpu_limit: Option<Value>,
    pub data_volume: Option<Value>,
    pub configuration: NodeConfig,
    pub tags: Option<Value>,
}

impl From<RawNode> for NodeRecord {
    fn from(raw: RawNode) -> Self {
        // Unlabelled nodes name their configuration files after the node id
        let file_label = raw.label.clone().or_else(|| raw.id.clone()).unwrap_or_default();
        let configuration = NodeConfig::new(file_label, raw.configuration);
        Self {
            id: raw.id,
            name: raw.label,
            definition: raw.node_definition,
            x: raw.x,
            y: raw.y,
            interfaces: raw.interfaces,
            boot_disk_size: raw.boot_disk_size,
            image_definition: raw.image_definition,
            ram: raw.ram,
            cpus: raw.cpus,
            cpu_limit: raw.cpu_limit,
            data_volume: raw.data_volume,
            configuration,
            tags: raw.tags,
        }
    }
}

/// A link between two node interfaces, resolved to node names and slots
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    /// Link identifier (`id`)
    pub name: Option<String>,
    /// Identifiers of the endpoint nodes (`n1`, `n2`)
    pub node_a_id: String,
    pub node_b_id: String,
    /// Display names of the endpoint nodes
    pub node_a: Option<String>,
    pub node_b: Option<String>,
    pub slot_a: Option<Value>,
    pub slot_b: Option<Value>,
}

fn empty_configuration() -> Value {
    Value::String(String::new())
}

/// Render a YAML scalar as text; null and collections have no text form
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}
