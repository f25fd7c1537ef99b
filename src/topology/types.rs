//! Topology type definitions.
//!
//! Node handles and the error kinds raised while building or validating a
//! topology.

/// Stable position of a node inside the topology arena.
///
/// Neighbor sets and cache entries store these instead of references, so the
/// topology stays the only owner of its nodes.
pub type NodeIndex = usize;

/// Errors raised by topology construction, lookup and validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Node {node} has no neighbors")]
    MissingNeighbors { node: String },

    #[error("Node {node} has {count} neighbors, the configured minimum is {min}")]
    NotEnoughNeighbors { node: String, count: usize, min: usize },

    #[error("Node {node} has {count} neighbors, the configured maximum is {max}")]
    TooManyNeighbors { node: String, count: usize, max: usize },

    #[error("Topology is partitioned: only {reached} of {total} nodes are reachable")]
    Partitioned { reached: usize, total: usize },

    #[error("Node {id} was not found in the topology")]
    NodeNotFound { id: String },

    #[error("No resources were provided for node {node}")]
    MissingResources { node: String },

    #[error("Node {node} cannot be its own neighbor")]
    SelfLoop { node: String },
}

