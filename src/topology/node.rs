//! Overlay peer.
//!
//! A node knows its identifier, the resources it hosts, the peers it is linked
//! to, and a cache of remote resource locations learned from informed searches.

use std::collections::{BTreeSet, HashMap};

use super::types::{NodeIndex, TopologyError};

/// A vertex of the overlay topology
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    index: NodeIndex,
    resources: BTreeSet<String>,
    neighbors: BTreeSet<NodeIndex>,
    cache: HashMap<String, NodeIndex>,
}

impl Node {
    pub(crate) fn new(id: String, index: NodeIndex) -> Self {
        Self {
            id,
            index,
            resources: BTreeSet::new(),
            neighbors: BTreeSet::new(),
            cache: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position of this node in its topology
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn resources(&self) -> &BTreeSet<String> {
        &self.resources
    }

    /// Neighbor indices in ascending order
    pub fn neighbors(&self) -> &BTreeSet<NodeIndex> {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Add one or more hosted resources.
    ///
    /// # Returns
    /// * `Err(TopologyError::MissingResources)` if `ids` yields nothing
    pub fn add_resources<I, S>(&mut self, ids: I) -> Result<(), TopologyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.resources.len();
        let mut supplied = false;
        for id in ids {
            supplied = true;
            self.resources.insert(id.into());
        }

        if !supplied {
            return Err(TopologyError::MissingResources {
                node: self.id.clone(),
            });
        }

        log::trace!(
            "Node {} now hosts {} resources ({} new)",
            self.id,
            self.resources.len(),
            self.resources.len() - before
        );
        Ok(())
    }

    /// Record one side of an adjacency. [`Topology`](super::Topology) mirrors
    /// the call on the peer so the relation stays symmetric.
    pub(crate) fn add_neighbor(&mut self, peer: NodeIndex) {
        self.neighbors.insert(peer);
    }

    /// True if the resource is hosted here
    pub fn hosts(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    /// True if the resource is hosted here or its location is cached
    pub fn knows_resource(&self, resource: &str) -> bool {
        self.hosts(resource) || self.cache.contains_key(resource)
    }

    /// Where this node believes the resource lives.
    ///
    /// A locally hosted resource resolves to this node itself.
    pub fn locate_cached(&self, resource: &str) -> Option<NodeIndex> {
        if self.hosts(resource) {
            Some(self.index)
        } else {
            self.cache.get(resource).copied()
        }
    }

    /// Remember that `location` hosts `resource`. Last write wins.
    pub fn record_cache(&mut self, location: NodeIndex, resource: &str) {
        self.cache.insert(resource.to_string(), location);
    }

    /// Cached location for a resource, ignoring local hosting
    pub fn cached_location(&self, resource: &str) -> Option<NodeIndex> {
        self.cache.get(resource).copied()
    }
}
