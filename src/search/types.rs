//! Core data types shared by the search strategies.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::topology::{NodeIndex, Topology};

/// Remaining hop budget of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Bounded(u32),
    Unbounded,
}

impl Ttl {
    /// True if a node holding this budget may still forward
    pub fn can_forward(self) -> bool {
        match self {
            Ttl::Bounded(hops) => hops > 0,
            Ttl::Unbounded => true,
        }
    }

    /// Budget left after one more hop
    pub fn decrement(self) -> Ttl {
        match self {
            Ttl::Bounded(hops) => Ttl::Bounded(hops.saturating_sub(1)),
            Ttl::Unbounded => Ttl::Unbounded,
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Bounded(hops) => write!(f, "{}", hops),
            Ttl::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Lifecycle of a single search run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Pending,
    Found,
    Exhausted,
}

/// The four resource-discovery strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Flooding,
    InformedFlooding,
    RandomWalk,
    InformedRandomWalk,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Flooding,
        Strategy::InformedFlooding,
        Strategy::RandomWalk,
        Strategy::InformedRandomWalk,
    ];

    /// Name used to request this strategy
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Flooding => "flooding",
            Strategy::InformedFlooding => "informed_flooding",
            Strategy::RandomWalk => "random_walk",
            Strategy::InformedRandomWalk => "informed_random_walk",
        }
    }

    /// Returns true for the cache-assisted variants
    pub fn is_informed(self) -> bool {
        matches!(self, Strategy::InformedFlooding | Strategy::InformedRandomWalk)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bookkeeping threaded through one search run.
///
/// Each run owns its own state, nothing here is shared between searches.
#[derive(Debug)]
pub struct SearchState<'r> {
    pub resource: &'r str,
    pub status: SearchStatus,
    pub visited: HashSet<NodeIndex>,
    pub messages: usize,
    pub finder: Option<NodeIndex>,
    pub path: Vec<NodeIndex>,
}

impl<'r> SearchState<'r> {
    pub fn new(resource: &'r str) -> Self {
        Self {
            resource,
            status: SearchStatus::Pending,
            visited: HashSet::new(),
            messages: 0,
            finder: None,
            path: Vec::new(),
        }
    }

    /// Mark a node visited, returning false if it already was
    pub fn visit(&mut self, node: NodeIndex) -> bool {
        self.visited.insert(node)
    }

    pub fn is_visited(&self, node: NodeIndex) -> bool {
        self.visited.contains(&node)
    }

    /// Terminate with a hit at `finder`, reached along `path`
    pub fn found(&mut self, finder: NodeIndex, path: Vec<NodeIndex>) {
        self.status = SearchStatus::Found;
        self.finder = Some(finder);
        self.path = path;
    }

    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// Write `resource -> finder` into every node on the discovery path
    pub fn propagate_cache(&self, topology: &mut Topology) {
        let Some(finder) = self.finder else {
            return;
        };
        for &node in &self.path {
            topology.node_mut(node).record_cache(finder, self.resource);
        }
        log::debug!(
            "Cached {} -> {} on {} nodes",
            self.resource,
            topology.node(finder).id(),
            self.path.len()
        );
    }

    /// Close the run and translate indices into node identifiers
    pub fn into_outcome(self, topology: &Topology) -> Outcome {
        let status = match self.status {
            SearchStatus::Found => SearchStatus::Found,
            SearchStatus::Pending | SearchStatus::Exhausted => SearchStatus::Exhausted,
        };
        let path = if status == SearchStatus::Found {
            self.path
                .iter()
                .map(|&node| topology.node(node).id().to_string())
                .collect()
        } else {
            Vec::new()
        };

        Outcome {
            status,
            found_at: self.finder.map(|node| topology.node(node).id().to_string()),
            path,
            messages: self.messages,
            nodes_involved: self.visited.len(),
        }
    }
}

/// Result of one search run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub status: SearchStatus,
    /// Node hosting the resource, if it was found
    pub found_at: Option<String>,
    /// Nodes from the start to the finder, both included
    pub path: Vec<String>,
    /// Messages exchanged between nodes
    pub messages: usize,
    /// Distinct nodes the query touched
    pub nodes_involved: usize,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }
}
