//! Breadth-first flooding.
//!
//! A query spreads from the start node to every neighbor while its hop budget
//! lasts. Nodes are marked visited when they are first enqueued, so a node
//! reached from several parents is only examined once.

use std::collections::VecDeque;

use log::{debug, trace};
use rand::rngs::StdRng;

use super::types::{Outcome, SearchState, SearchStatus, Ttl};
use crate::topology::{NodeIndex, Topology};

/// A queued query copy: the node to examine, its remaining budget, and the
/// node it jumped from when it came out of a cache
type Pending = (NodeIndex, Ttl, Option<NodeIndex>);

/// Blind flooding
pub fn flooding(
    topology: &mut Topology,
    start: NodeIndex,
    resource: &str,
    ttl: Ttl,
    _rng: &mut StdRng,
) -> Outcome {
    flood(topology, start, resource, ttl, false)
}

/// Flooding that short-circuits through cached resource locations and
/// caches the finder along the discovery path
pub fn informed_flooding(
    topology: &mut Topology,
    start: NodeIndex,
    resource: &str,
    ttl: Ttl,
    _rng: &mut StdRng,
) -> Outcome {
    flood(topology, start, resource, ttl, true)
}

fn flood(
    topology: &mut Topology,
    start: NodeIndex,
    resource: &str,
    ttl: Ttl,
    informed: bool,
) -> Outcome {
    let mut state = SearchState::new(resource);
    let mut queue: VecDeque<Pending> = VecDeque::new();
    // Node each first-time visit arrived from, the start has none
    let mut parent: Vec<Option<NodeIndex>> = vec![None; topology.len()];

    state.visit(start);
    queue.push_back((start, ttl, None));

    while let Some((current, remaining, jumped_from)) = queue.pop_front() {
        let node = topology.node(current);

        if node.hosts(resource) {
            let path = match jumped_from {
                Some(origin) => {
                    let mut path = trace_path(&parent, origin);
                    path.push(current);
                    path
                }
                None => trace_path(&parent, current),
            };
            state.found(current, path);
            break;
        }

        if !remaining.can_forward() {
            continue;
        }

        // The query is not sent back over the link it arrived on
        let sender = parent[current];

        for &neighbor in node.neighbors() {
            if Some(neighbor) == sender {
                continue;
            }

            state.messages += 1;
            trace!("{} -> {} (ttl {})", node.id(), topology.node(neighbor).id(), remaining);

            // Duplicates are dropped by the receiver
            if !state.visit(neighbor) {
                continue;
            }

            if informed {
                if let Some(target) = topology.node(neighbor).locate_cached(resource) {
                    debug!(
                        "{} knows {} is at {}, jumping there",
                        topology.node(neighbor).id(),
                        resource,
                        topology.node(target).id()
                    );
                    state.visit(target);
                    queue.push_front((target, Ttl::Bounded(0), Some(current)));
                    break;
                }
            }

            parent[neighbor] = Some(current);
            queue.push_back((neighbor, remaining.decrement(), None));
        }
    }

    if state.is_found() {
        if informed {
            state.propagate_cache(topology);
        }
    } else {
        state.status = SearchStatus::Exhausted;
    }

    debug!(
        "Flooding for {} from {} finished: {:?}, {} messages, {} nodes",
        resource,
        topology.node(start).id(),
        state.status,
        state.messages,
        state.visited.len()
    );
    state.into_outcome(topology)
}

/// Follow parent links back from `finder` to the start
fn trace_path(parent: &[Option<NodeIndex>], finder: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![finder];
    let mut current = finder;
    while let Some(previous) = parent[current] {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// n1 - n2 - n3 - n4 - n1 with resource "f" at n3
    fn ring() -> Topology {
        let mut topology = Topology::new(4, 2, 2);
        topology.add_edge("n1", &["n2", "n4"]).unwrap();
        topology.add_edge("n3", &["n2", "n4"]).unwrap();
        topology.add_resources("n3", &["f"]).unwrap();
        topology.check().unwrap();
        topology
    }

    /// n1 - n2 - ... - n{len}
    fn line(len: usize) -> Topology {
        let mut topology = Topology::new(len, 1, 2);
        for i in 1..len {
            topology
                .add_edge(&format!("n{}", i), &[format!("n{}", i + 1)])
                .unwrap();
        }
        topology
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_ring_found_within_two_hops() {
        let mut topology = ring();
        let outcome = flooding(&mut topology, 0, "f", Ttl::Bounded(2), &mut rng());

        assert!(outcome.is_found());
        assert_eq!(outcome.found_at.as_deref(), Some("n3"));
        assert_eq!(outcome.messages, 4);
        assert_eq!(outcome.path.len(), 3);
        assert_eq!(outcome.path.first().map(String::as_str), Some("n1"));
        assert_eq!(outcome.path.last().map(String::as_str), Some("n3"));
        assert!(outcome.path[1] == "n2" || outcome.path[1] == "n4");
        assert_eq!(outcome.nodes_involved, 4);
    }

    #[test]
    fn test_ring_not_found_within_one_hop() {
        let mut topology = ring();
        let outcome = flooding(&mut topology, 0, "f", Ttl::Bounded(1), &mut rng());

        assert_eq!(outcome.status, SearchStatus::Exhausted);
        assert_eq!(outcome.found_at, None);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.messages, 2);
        assert_eq!(outcome.nodes_involved, 3);
    }

    #[test]
    fn test_resource_at_start() {
        let mut topology = ring();
        let outcome = flooding(&mut topology, 2, "f", Ttl::Bounded(0), &mut rng());

        assert!(outcome.is_found());
        assert_eq!(outcome.path, vec!["n3".to_string()]);
        assert_eq!(outcome.messages, 0);
        assert_eq!(outcome.nodes_involved, 1);
    }

    #[test]
    fn test_zero_ttl_does_not_forward() {
        let mut topology = ring();
        let outcome = flooding(&mut topology, 0, "f", Ttl::Bounded(0), &mut rng());

        assert!(!outcome.is_found());
        assert_eq!(outcome.messages, 0);
        assert_eq!(outcome.nodes_involved, 1);
    }

    #[test]
    fn test_exhaustive_within_budget() {
        for distance in 1..6 {
            let mut topology = line(6);
            let target = format!("n{}", distance + 1);
            topology.add_resources(&target, &["r"]).unwrap();

            let budget = distance as u32;
            let reached = flooding(&mut topology, 0, "r", Ttl::Bounded(budget), &mut rng());
            assert!(reached.is_found(), "distance {}", distance);
            assert_eq!(reached.path.len(), distance + 1);

            let short = flooding(&mut topology, 0, "r", Ttl::Bounded(budget - 1), &mut rng());
            assert!(!short.is_found(), "distance {}", distance);
        }
    }

    #[test]
    fn test_unbounded_ttl_visits_each_node_once() {
        let mut topology = ring();
        let outcome = flooding(&mut topology, 0, "missing", Ttl::Unbounded, &mut rng());

        assert!(!outcome.is_found());
        assert_eq!(outcome.nodes_involved, 4);
        // n1 sends 2, n2 and n4 forward to n3, and n3 forwards to whichever
        // peer it did not hear from first
        assert_eq!(outcome.messages, 5);
    }

    #[test]
    fn test_blind_flooding_leaves_caches_alone() {
        let mut topology = ring();
        flooding(&mut topology, 0, "f", Ttl::Unbounded, &mut rng());
        assert!(topology.nodes().all(|n| n.cached_location("f").is_none()));
    }

    #[test]
    fn test_informed_flooding_populates_path_cache() {
        let mut topology = ring();
        let outcome = informed_flooding(&mut topology, 0, "f", Ttl::Unbounded, &mut rng());

        assert!(outcome.is_found());
        for id in &outcome.path {
            let node = topology.find_node(id).unwrap();
            assert_eq!(node.cached_location("f"), Some(2), "cache on {}", id);
        }
        // n4 was not on the path n1 -> n2 -> n3
        assert_eq!(topology.find_node("n4").unwrap().cached_location("f"), None);
    }

    #[test]
    fn test_informed_flooding_jumps_through_cache() {
        let mut topology = line(6);
        topology.add_resources("n6", &["r"]).unwrap();
        topology.node_mut(1).record_cache(5, "r");

        // Blind flooding needs five hops, the cached location at n2 needs one
        let blind = flooding(&mut topology, 0, "r", Ttl::Bounded(1), &mut rng());
        assert!(!blind.is_found());

        let outcome = informed_flooding(&mut topology, 0, "r", Ttl::Bounded(1), &mut rng());
        assert!(outcome.is_found());
        assert_eq!(outcome.found_at.as_deref(), Some("n6"));
        assert_eq!(outcome.path, vec!["n1".to_string(), "n6".to_string()]);
        assert_eq!(outcome.messages, 1);
        assert_eq!(topology.find_node("n1").unwrap().cached_location("f"), None);
        assert_eq!(topology.find_node("n1").unwrap().cached_location("r"), Some(5));
    }

    #[test]
    fn test_informed_flooding_reuses_earlier_discovery() {
        let mut topology = ring();
        let first = informed_flooding(&mut topology, 0, "f", Ttl::Unbounded, &mut rng());
        assert_eq!(first.path, vec!["n1", "n2", "n3"]);

        // From n4 the first neighbor examined is n1, whose cache names n3
        let second = informed_flooding(&mut topology, 3, "f", Ttl::Unbounded, &mut rng());
        assert!(second.is_found());
        assert_eq!(second.path, vec!["n4", "n3"]);
        assert_eq!(second.messages, 1);
    }

    #[test]
    fn test_long_line_flood() {
        let len = 100_000;
        let mut topology = line(len);
        topology.add_resources(&format!("n{}", len), &["r"]).unwrap();
        topology.check().unwrap();

        let outcome = flooding(&mut topology, 0, "r", Ttl::Unbounded, &mut rng());
        assert!(outcome.is_found());
        assert_eq!(outcome.path.len(), len);
        assert_eq!(outcome.path.first().map(String::as_str), Some("n1"));
        assert_eq!(outcome.messages, len - 1);
        assert_eq!(outcome.nodes_involved, len);
    }
}
