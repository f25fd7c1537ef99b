//! Overlay topology module.
//!
//! This module contains the node arena, identifier lookup, link and resource
//! mutation, and the structural validation run before any search.

pub mod network;
pub mod node;
pub mod types;

// Re-export key types for easier access
pub use network::Topology;
pub use node::Node;
pub use types::{NodeIndex, TopologyError};
