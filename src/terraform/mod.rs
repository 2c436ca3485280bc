//! Terraform project rendering.
//!
//! Produces the text of `variables.tf` and `main.tf` for the CML2 Terraform
//! provider from a [`Topology`]. How each node's configuration appears in
//! `main.tf` is decided by the caller and passed in as a
//! [`ConfigPlacement`] per node.

pub mod hcl;

use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::node_config::{NodeConfig, NodeConfigError};
use crate::topology::{LinkRecord, NodeRecord, Topology, TopologyError};

/// Terraform registry source of the CML2 provider
pub const PROVIDER_SOURCE: &str = "CiscoDevNet/cml2";

/// Name of the single lab resource every node and link belongs to
const LAB_RESOURCE: &str = "cml2_lab.this";

const VARIABLES_TF: &str = r#"variable "address" {
  description = "CML controller address"
  type        = string
  default     = "https://cml-controller.cml.lab"
}

variable "username" {
  description = "CML controller username"
  type        = string
  default     = "admin"
}

variable "password" {
  description = "CML controller password"
  type        = string
  sensitive   = true
}

variable "skip_verify" {
  description = "Disable TLS certificate verification"
  type        = bool
  default     = true
}
"#;

/// Where a node's configuration goes in `main.tf`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPlacement {
    /// Empty configuration, no attribute is written
    Omitted,
    /// Single line, written as a quoted string
    Inline(String),
    /// Several lines, already indented for a heredoc
    Heredoc(String),
    /// Extracted to a file next to `main.tf`
    File(String),
}

impl ConfigPlacement {
    /// Decide the placement of a node configuration.
    ///
    /// With `separate_files` set, non-empty configurations are written into
    /// `project_dir` and referenced by file name.
    pub fn for_config(
        config: &NodeConfig,
        separate_files: bool,
        project_dir: &Path,
    ) -> Result<Self, NodeConfigError> {
        if config.empty()? {
            return Ok(Self::Omitted);
        }
        if separate_files {
            return Ok(Self::File(config.fileout(project_dir)?));
        }
        if config.oneline()? {
            Ok(Self::Inline(config.out(0)?))
        } else {
            Ok(Self::Heredoc(config.out(4)?))
        }
    }
}

/// Render `variables.tf`, declaring the provider connection settings
pub fn render_variables_tf() -> String {
    VARIABLES_TF.to_string()
}

/// Render `main.tf` for a topology.
///
/// # Arguments
/// * `topology` - The lab topology model
/// * `placements` - Configuration placement for each node, in node order
///
/// # Returns
/// * The file content, or an error if the lab metadata is missing
///
/// Resource names are derived from node labels and link ids. Names that
/// collide after sanitizing get a numeric suffix in document order, and
/// links always reference their endpoints by node id.
pub fn render_main_tf(
    topology: &Topology,
    placements: &[ConfigPlacement],
) -> Result<String, TopologyError> {
    let mut out = String::new();

    out.push_str("terraform {\n");
    out.push_str("  required_providers {\n");
    out.push_str("    cml2 = {\n");
    out.push_str(&format!("      source = {}\n", hcl::quote(PROVIDER_SOURCE)));
    out.push_str("    }\n");
    out.push_str("  }\n");
    out.push_str("}\n\n");

    out.push_str("provider \"cml2\" {\n");
    out.push_str("  address     = var.address\n");
    out.push_str("  username    = var.username\n");
    out.push_str("  password    = var.password\n");
    out.push_str("  skip_verify = var.skip_verify\n");
    out.push_str("}\n\n");

    out.push_str("resource \"cml2_lab\" \"this\" {\n");
    let lab_fields = [
        ("title", topology.lab_title()?),
        ("description", topology.lab_description()?),
        ("notes", topology.lab_notes()?),
    ];
    for (key, value) in lab_fields {
        if let Some(value) = value {
            out.push_str(&format!("  {} = {}\n", key, hcl::quote(&value)));
        }
    }
    out.push_str("}\n");

    let mut elements = Vec::new();
    let mut node_names = HashSet::new();
    // First node wins on duplicate ids, as in endpoint resolution
    let mut node_resources: HashMap<&str, String> = HashMap::new();

    for (index, node) in topology.nodes().iter().enumerate() {
        let placement = placements.get(index).cloned().unwrap_or(ConfigPlacement::Omitted);
        let resource = unique_name(&mut node_names, node_resource_name(node.name.as_deref()));
        if let Some(id) = node.id.as_deref() {
            node_resources.entry(id).or_insert_with(|| resource.clone());
        }
        out.push('\n');
        render_node(&mut out, &resource, node, &placement);
        elements.push(format!("cml2_node.{}.id", resource));
    }

    let mut link_names = HashSet::new();
    for (index, link) in topology.links().iter().enumerate() {
        let resource = unique_name(&mut link_names, link_resource_name(link, index));
        let node_a = endpoint_resource(&node_resources, &link.node_a_id, link.node_a.as_deref());
        let node_b = endpoint_resource(&node_resources, &link.node_b_id, link.node_b.as_deref());
        out.push('\n');
        render_link(&mut out, &resource, [node_a.as_str(), node_b.as_str()], link);
        elements.push(format!("cml2_link.{}.id", resource));
    }

    out.push_str("\nresource \"cml2_lifecycle\" \"top\" {\n");
    out.push_str(&format!("  lab_id = {}.id\n", LAB_RESOURCE));
    if elements.is_empty() {
        out.push_str("  elements = []\n");
    } else {
        out.push_str("  elements = [\n");
        for element in &elements {
            out.push_str(&format!("    {},\n", element));
        }
        out.push_str("  ]\n");
    }
    out.push_str("}\n");

    debug!("Rendered main.tf with {} lifecycle elements", elements.len());
    Ok(out)
}

fn node_resource_name(name: Option<&str>) -> String {
    hcl::identifier(name.unwrap_or_default())
}

fn link_resource_name(link: &LinkRecord, index: usize) -> String {
    match &link.name {
        Some(name) => hcl::identifier(name),
        None => format!("link_{}", index),
    }
}

/// Reserve `base`, or `base_2`, `base_3`... if it is already taken
fn unique_name(taken: &mut HashSet<String>, base: String) -> String {
    let mut name = base.clone();
    let mut suffix = 1;
    while !taken.insert(name.clone()) {
        suffix += 1;
        name = format!("{}_{}", base, suffix);
    }
    if suffix > 1 {
        warn!("Resource name '{}' is already used, renamed to '{}'", base, name);
    }
    name
}

fn endpoint_resource(
    resources: &HashMap<&str, String>,
    node_id: &str,
    name: Option<&str>,
) -> String {
    resources
        .get(node_id)
        .cloned()
        .unwrap_or_else(|| node_resource_name(name))
}

fn render_node(out: &mut String, resource: &str, node: &NodeRecord, placement: &ConfigPlacement) {
    out.push_str(&format!("resource \"cml2_node\" \"{}\" {{\n", resource));
    out.push_str(&format!("  lab_id = {}.id\n", LAB_RESOURCE));

    let text_attrs = [
        ("label", node.name.as_deref()),
        ("nodedefinition", node.definition.as_deref()),
        ("imagedefinition", node.image_definition.as_deref()),
    ];
    for (key, value) in text_attrs {
        if let Some(value) = value {
            out.push_str(&format!("  {} = {}\n", key, hcl::quote(value)));
        }
    }

    let value_attrs = [
        ("x", &node.x),
        ("y", &node.y),
        ("ram", &node.ram),
        ("cpus", &node.cpus),
        ("cpu_limit", &node.cpu_limit),
        ("boot_disk_size", &node.boot_disk_size),
        ("data_volume", &node.data_volume),
    ];
    for (key, value) in value_attrs {
        if let Some(literal) = value.as_ref().and_then(hcl::literal) {
            out.push_str(&format!("  {} = {}\n", key, literal));
        }
    }

    // Empty tag lists are left out
    let tags = node.tags.as_ref();
    if let Some(tags) = tags.filter(|tags| tags.as_sequence().map_or(true, |s| !s.is_empty())) {
        if let Some(literal) = hcl::literal(tags) {
            out.push_str(&format!("  tags = {}\n", literal));
        }
    }

    match placement {
        ConfigPlacement::Omitted => {}
        ConfigPlacement::Inline(text) => {
            out.push_str(&format!("  configuration = {}\n", hcl::quote(text)));
        }
        ConfigPlacement::Heredoc(text) => {
            out.push_str(&format!("  configuration = {}\n", hcl::heredoc(text, 2)));
        }
        ConfigPlacement::File(file_name) => {
            out.push_str(&format!(
                "  configuration = file(\"${{path.module}}/{}\")\n",
                hcl::escape_string(file_name)
            ));
        }
    }

    out.push_str("}\n");
}

fn render_link(out: &mut String, resource: &str, endpoints: [&str; 2], link: &LinkRecord) {
    out.push_str(&format!("resource \"cml2_link\" \"{}\" {{\n", resource));
    out.push_str(&format!("  lab_id = {}.id\n", LAB_RESOURCE));
    out.push_str(&format!("  node_a = cml2_node.{}.id\n", endpoints[0]));
    out.push_str(&format!("  node_b = cml2_node.{}.id\n", endpoints[1]));
    if let Some(slot) = link.slot_a.as_ref().and_then(hcl::literal) {
        out.push_str(&format!("  slot_a = {}\n", slot));
    }
    if let Some(slot) = link.slot_b.as_ref().and_then(hcl::literal) {
        out.push_str(&format!("  slot_b = {}\n", slot));
    }
    out.push_str("}\n");
}
