//! Overlay topology.
//!
//! The topology owns every node in an arena indexed by [`NodeIndex`]. It is
//! built once from a [`NetworkDescription`], validated once with
//! [`Topology::check`], and then read by the search strategies. Only node
//! caches change after validation.

use std::collections::{HashMap, VecDeque};

use log::{debug, info};

use super::node::Node;
use super::types::{NodeIndex, TopologyError};
use crate::config::NetworkDescription;

/// An undirected overlay graph with degree bounds
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
    index: HashMap<String, NodeIndex>,
    min_neighbors: usize,
    max_neighbors: usize,
}

impl Topology {
    /// Create `node_count` unlinked nodes named `n1..n{node_count}`
    pub fn new(node_count: usize, min_neighbors: usize, max_neighbors: usize) -> Self {
        let mut nodes = Vec::with_capacity(node_count);
        let mut index = HashMap::with_capacity(node_count);

        for i in 0..node_count {
            let id = format!("n{}", i + 1);
            index.insert(id.clone(), i);
            nodes.push(Node::new(id, i));
        }

        Self {
            nodes,
            index,
            min_neighbors,
            max_neighbors,
        }
    }

    /// Build a topology from a parsed description.
    ///
    /// Resources are applied before edges. The result is not validated, call
    /// [`Topology::check`] before searching.
    pub fn from_description(description: &NetworkDescription) -> Result<Self, TopologyError> {
        let mut topology = Self::new(
            description.num_nodes,
            description.min_neighbors,
            description.max_neighbors,
        );

        for (node_id, resources) in &description.resources {
            topology.add_resources(node_id, resources.as_slice())?;
        }

        for (node_id, neighbors) in &description.edges {
            topology.add_edge(node_id, neighbors.as_slice())?;
        }

        info!(
            "Built topology with {} nodes and {} links",
            topology.len(),
            topology.edge_count()
        );
        Ok(topology)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn min_neighbors(&self) -> usize {
        self.min_neighbors
    }

    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }

    /// Number of undirected links
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(Node::degree).sum::<usize>() / 2
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Look up a node by identifier
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Resolve an identifier to its arena index
    pub fn resolve(&self, id: &str) -> Result<NodeIndex, TopologyError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| TopologyError::NodeNotFound { id: id.to_string() })
    }

    /// Node at an index handed out by this topology.
    ///
    /// Panics on an index from a different topology.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Link `id` with every node in `neighbor_ids`, in both directions.
    ///
    /// All identifiers are resolved before any link is made, so a failure
    /// leaves the topology untouched.
    ///
    /// # Returns
    /// * `Err(TopologyError::MissingNeighbors)` if `neighbor_ids` is empty
    /// * `Err(TopologyError::NodeNotFound)` naming the first unresolved id
    /// * `Err(TopologyError::SelfLoop)` if `id` lists itself
    pub fn add_edge<S: AsRef<str>>(
        &mut self,
        id: &str,
        neighbor_ids: &[S],
    ) -> Result<(), TopologyError> {
        let node = self.resolve(id)?;

        if neighbor_ids.is_empty() {
            return Err(TopologyError::MissingNeighbors { node: id.to_string() });
        }

        let peers = neighbor_ids
            .iter()
            .map(|peer_id| {
                let peer = self.resolve(peer_id.as_ref())?;
                if peer == node {
                    return Err(TopologyError::SelfLoop { node: id.to_string() });
                }
                Ok(peer)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for peer in peers {
            self.connect(node, peer);
        }
        Ok(())
    }

    /// Mirror an adjacency between two resolved nodes
    fn connect(&mut self, a: NodeIndex, b: NodeIndex) {
        self.nodes[a].add_neighbor(b);
        self.nodes[b].add_neighbor(a);
    }

    /// Add hosted resources to the node named `id`
    pub fn add_resources<S: AsRef<str>>(
        &mut self,
        id: &str,
        resource_ids: &[S],
    ) -> Result<(), TopologyError> {
        let node = self.resolve(id)?;
        self.nodes[node].add_resources(resource_ids.iter().map(|r| r.as_ref().to_string()))
    }

    /// Number of nodes reachable from the first node by breadth-first search
    fn reachable_count(&self) -> usize {
        let Some(start) = self.nodes.first().map(Node::index) else {
            return 0;
        };

        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        let mut reached = 1;

        while let Some(current) = queue.pop_front() {
            for &neighbor in self.nodes[current].neighbors() {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    reached += 1;
                    queue.push_back(neighbor);
                }
            }
        }

        reached
    }

    /// True if some node cannot be reached from the others
    pub fn is_partitioned(&self) -> bool {
        self.reachable_count() < self.nodes.len()
    }

    /// Validate degree bounds and connectivity.
    ///
    /// Every node is checked in index order for no neighbors, then too few,
    /// then too many. The partition check runs last. The first violation is
    /// returned.
    pub fn check(&self) -> Result<(), TopologyError> {
        for node in &self.nodes {
            let count = node.degree();

            if count == 0 {
                return Err(TopologyError::MissingNeighbors {
                    node: node.id().to_string(),
                });
            }

            if count < self.min_neighbors {
                return Err(TopologyError::NotEnoughNeighbors {
                    node: node.id().to_string(),
                    count,
                    min: self.min_neighbors,
                });
            }

            if count > self.max_neighbors {
                return Err(TopologyError::TooManyNeighbors {
                    node: node.id().to_string(),
                    count,
                    max: self.max_neighbors,
                });
            }
        }

        let reached = self.reachable_count();
        if reached < self.nodes.len() {
            return Err(TopologyError::Partitioned {
                reached,
                total: self.nodes.len(),
            });
        }

        debug!(
            "Topology check passed: {} nodes, degrees within [{}, {}]",
            self.nodes.len(),
            self.min_neighbors,
            self.max_neighbors
        );
        Ok(())
    }
}
