//! # cml2tf - Convert CML2 lab topologies into Terraform projects
//!
//! This library turns a lab topology exported from Cisco Modeling Labs
//! (CML2) as YAML into a Terraform project for the CML2 provider.
//!
//! ## Architecture
//!
//! - `loader`: Reads the exported YAML document
//! - `topology`: Builds node and link records, resolving link endpoints
//! - `node_config`: Normalizes the two node configuration formats
//! - `terraform`: Renders `variables.tf` and `main.tf`
//! - `convert`: Orchestrates a conversion into a project directory
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cml2tf::{convert, loader};
//! use std::path::Path;
//!
//! let document = loader::load_topology(Path::new("topology.yaml"))?;
//! let options = convert::ConvertOptions { configs: true, force: false };
//! convert::convert(&document, Path::new("topology"), &options)?;
//!
//! // The topology directory now contains:
//! // - variables.tf: provider connection variables
//! // - main.tf: lab, nodes, links and lifecycle resources
//! // - <node label>[-<segment>].cfg: extracted node configurations
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! The core modules return typed errors (`TopologyError`,
//! `NodeConfigError`). The loader and the orchestrator wrap them with
//! `color_eyre` context.

pub mod convert;
pub mod loader;
pub mod node_config;
pub mod terraform;
pub mod topology;

pub use node_config::{NodeConfig, NodeConfigError};
pub use topology::{LinkRecord, NodeRecord, Topology, TopologyError};
