use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Load and parse a CML2 lab export from a YAML file.
///
/// The document is returned untyped; [`crate::topology::Topology`] does the
/// best-effort field extraction. An empty file yields `Value::Null`.
pub fn load_topology(topology_path: &Path) -> Result<Value> {
    info!("Loading lab topology from: {:?}", topology_path);

    let content = fs::read_to_string(topology_path)
        .wrap_err_with(|| format!("Error reading topology file '{}'", topology_path.display()))?;

    if content.trim().is_empty() {
        warn!("Topology file {:?} is empty", topology_path);
        return Ok(Value::Null);
    }

    let document: Value = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Error parsing topology file '{}'", topology_path.display()))?;

    if !matches!(document, Value::Mapping(_) | Value::Null) {
        warn!("Topology file {:?} does not contain a YAML mapping", topology_path);
    }

    Ok(document)
}
