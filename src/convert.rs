//! Conversion orchestrator.
//!
//! This module coordinates the whole conversion: building the topology
//! model, preparing the project directory, extracting node configurations
//! and writing the rendered Terraform files.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::terraform::{self, ConfigPlacement};
use crate::topology::Topology;

pub const MAIN_TF: &str = "main.tf";
pub const VARIABLES_TF: &str = "variables.tf";

/// Errors specific to preparing the output project
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Directory '{path}' already exists. Please remove it first")]
    DirectoryExists { path: String },
}

/// Output options of a conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Store node configurations in separate `.cfg` files
    pub configs: bool,
    /// Reuse an existing project directory and keep its `variables.tf`
    pub force: bool,
}

/// Files produced by a conversion
#[derive(Debug, Default)]
pub struct ConvertSummary {
    pub project_dir: PathBuf,
    pub written: Vec<PathBuf>,
}

/// Convert a parsed CML2 topology into a Terraform project in `project_dir`.
///
/// The topology is fully resolved before anything touches the disk, so a
/// dangling link leaves no partial project behind.
pub fn convert(
    document: &Value,
    project_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let topology = Topology::new(document).wrap_err("Failed to read lab topology")?;
    // Lab metadata is required by main.tf; check it before creating anything
    topology.lab_title()?;
    topology.lab_description()?;
    topology.lab_notes()?;

    create_directory(project_dir, options.force)?;

    let mut summary = ConvertSummary {
        project_dir: project_dir.to_path_buf(),
        written: Vec::new(),
    };

    let variables_path = project_dir.join(VARIABLES_TF);
    if options.force && variables_path.exists() {
        info!("Keeping existing {:?}", variables_path);
    } else {
        save_file_to_disk(&variables_path, &terraform::render_variables_tf())?;
        summary.written.push(variables_path);
    }

    let mut placements = Vec::with_capacity(topology.nodes().len());
    for node in topology.nodes() {
        let placement =
            ConfigPlacement::for_config(&node.configuration, options.configs, project_dir)
                .wrap_err_with(|| {
                    format!("Failed to process configuration of node {:?}", node.name)
                })?;
        if let ConfigPlacement::File(file_name) = &placement {
            info!("File '{}' saved successfully.", file_name);
            summary.written.push(project_dir.join(file_name));
        }
        placements.push(placement);
    }

    let main_tf = terraform::render_main_tf(&topology, &placements)
        .wrap_err("Failed to render main.tf")?;
    let main_path = project_dir.join(MAIN_TF);
    save_file_to_disk(&main_path, &main_tf)?;
    summary.written.push(main_path);

    Ok(summary)
}

/// Create the project directory.
///
/// An existing directory is an error unless `force` is set.
pub fn create_directory(directory: &Path, force: bool) -> Result<()> {
    if !directory.exists() {
        fs::create_dir_all(directory)
            .wrap_err_with(|| format!("Failed to create directory '{}'", directory.display()))?;
        info!("Directory {:?} for Terraform project created successfully.", directory);
        return Ok(());
    }

    if !force {
        return Err(ConvertError::DirectoryExists {
            path: directory.display().to_string(),
        }
        .into());
    }

    warn!("Directory {:?} already exists. Force flag set... Ignoring...", directory);
    Ok(())
}

/// Save content to a file, replacing any previous content
pub fn save_file_to_disk(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).wrap_err_with(|| format!("Unable to save file '{}'", path.display()))?;
    info!("File {:?} saved successfully.", path);
    Ok(())
}

/// Default project directory: the input path without its extension
pub fn default_project_dir(input: &Path) -> PathBuf {
    input.with_extension("")
}
