//! Topology model construction.
//!
//! Builds node records from the `nodes` section of an exported lab, then
//! resolves every entry of the `links` section to the display names and
//! interface slots of its two endpoints.

use log::{debug, info};
use serde_yaml::{Mapping, Value};

use super::types::{
    scalar_text, LinkRecord, NodeRecord, RawLink, RawNode, TopologyError,
};

/// Normalized, read-only view of a CML2 lab export
#[derive(Debug, Clone)]
pub struct Topology {
    lab: Option<Mapping>,
    nodes: Vec<NodeRecord>,
    links: Vec<LinkRecord>,
}

impl Topology {
    /// Build the topology model from a parsed YAML document.
    ///
    /// Missing `nodes` or `links` sections are treated as empty. Fails on the
    /// first link whose node or interface cannot be resolved.
    pub fn new(document: &Value) -> Result<Self, TopologyError> {
        let lab = match document.get("lab") {
            Some(Value::Mapping(lab)) => Some(lab.clone()),
            _ => None,
        };

        let nodes = read_section::<RawNode>(document, "nodes")?
            .into_iter()
            .map(NodeRecord::from)
            .collect::<Vec<_>>();

        let mut topology = Self {
            lab,
            nodes,
            links: Vec::new(),
        };

        let links = read_section::<RawLink>(document, "links")?
            .iter()
            .map(|link| topology.resolve_link(link))
            .collect::<Result<Vec<_>, _>>()?;
        topology.links = links;

        info!(
            "Read lab topology with {} nodes and {} links",
            topology.nodes.len(),
            topology.links.len()
        );
        Ok(topology)
    }

    /// The raw `lab` section, if the document has one
    pub fn lab_info(&self) -> Option<&Mapping> {
        self.lab.as_ref()
    }

    pub fn lab_title(&self) -> Result<Option<String>, TopologyError> {
        self.lab_field("title")
    }

    pub fn lab_description(&self) -> Result<Option<String>, TopologyError> {
        self.lab_field("description")
    }

    pub fn lab_notes(&self) -> Result<Option<String>, TopologyError> {
        self.lab_field("notes")
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    /// Returns the display name of the node with the given identifier
    pub fn node_name_by_id(&self, node_id: &str) -> Result<Option<&str>, TopologyError> {
        Ok(self.find_node(node_id)?.name.as_deref())
    }

    /// Returns the slot of interface `interface_id` on node `node_id`.
    ///
    /// An unknown node and an unknown interface are reported the same way.
    pub fn interface_slot_by_id(
        &self,
        node_id: &str,
        interface_id: &str,
    ) -> Result<Option<&Value>, TopologyError> {
        // Entries that are not mappings simply never match
        let interfaces = self.find_node(node_id)?.interfaces.as_ref().and_then(Value::as_sequence);
        interfaces
            .into_iter()
            .flatten()
            .find(|iface| iface.get("id").and_then(scalar_text).as_deref() == Some(interface_id))
            .map(|iface| iface.get("slot").filter(|slot| !slot.is_null()))
            .ok_or_else(|| not_found(node_id))
    }

    fn find_node(&self, node_id: &str) -> Result<&NodeRecord, TopologyError> {
        self.nodes
            .iter()
            .find(|node| node.id.as_deref() == Some(node_id))
            .ok_or_else(|| not_found(node_id))
    }

    fn resolve_link(&self, link: &RawLink) -> Result<LinkRecord, TopologyError> {
        let n1 = link.n1.as_deref().unwrap_or_default();
        let n2 = link.n2.as_deref().unwrap_or_default();
        let i1 = link.i1.as_deref().unwrap_or_default();
        let i2 = link.i2.as_deref().unwrap_or_default();

        let record = LinkRecord {
            name: link.id.clone(),
            node_a_id: n1.to_string(),
            node_b_id: n2.to_string(),
            node_a: self.node_name_by_id(n1)?.map(str::to_string),
            node_b: self.node_name_by_id(n2)?.map(str::to_string),
            slot_a: self.interface_slot_by_id(n1, i1)?.cloned(),
            slot_b: self.interface_slot_by_id(n2, i2)?.cloned(),
        };
        debug!("Resolved link {:?}: {}.{} <-> {}.{}", record.name, n1, i1, n2, i2);
        Ok(record)
    }

    // A null or empty value reads as absent, but a missing key is an error.
    fn lab_field(&self, field: &'static str) -> Result<Option<String>, TopologyError> {
        let lab = self.lab.as_ref().ok_or(TopologyError::MissingLab)?;
        let value = lab.get(field).ok_or(TopologyError::MissingLabField { field })?;
        Ok(scalar_text(value).filter(|text| !text.is_empty()))
    }
}

fn not_found(node_id: &str) -> TopologyError {
    TopologyError::NotFound {
        node_id: node_id.to_string(),
    }
}

/// Deserialize every entry of a top-level sequence; absent or null is empty
fn read_section<T>(document: &Value, section: &'static str) -> Result<Vec<T>, TopologyError>
where
    T: serde::de::DeserializeOwned,
{
    let entries = match document.get(section) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err(TopologyError::InvalidSection { section }),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_yaml::from_value(entry.clone())
                .map_err(|source| TopologyError::InvalidEntry { section, index, source })
        })
        .collect()
}
