//! Lab topology model.
//!
//! This module turns a parsed CML2 export into ordered node and link
//! records, resolving link endpoints to node names and interface slots.

pub mod builder;
pub mod types;

// Re-export key types for easier access
pub use builder::Topology;
pub use types::{LinkRecord, NodeRecord, TopologyError};
