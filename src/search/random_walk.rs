//! Random walks.
//!
//! The walker carries a single query copy. At each node it shuffles the
//! neighbors and steps into the first one it has not visited yet. When that
//! sub-walk comes back empty the loop moves on to the next admissible
//! neighbor. The visited set spans the whole run, so a walk that wandered
//! through a node early can never enter it again from a shorter route.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Outcome, SearchState, SearchStatus, Ttl};
use crate::topology::{NodeIndex, Topology};

/// Blind random walk
pub fn random_walk(
    topology: &mut Topology,
    start: NodeIndex,
    resource: &str,
    ttl: Ttl,
    rng: &mut StdRng,
) -> Outcome {
    run(topology, start, resource, ttl, rng, false)
}

/// Random walk that jumps to cached resource locations and caches the
/// finder along the walked path
pub fn informed_random_walk(
    topology: &mut Topology,
    start: NodeIndex,
    resource: &str,
    ttl: Ttl,
    rng: &mut StdRng,
) -> Outcome {
    run(topology, start, resource, ttl, rng, true)
}

fn run(
    topology: &mut Topology,
    start: NodeIndex,
    resource: &str,
    ttl: Ttl,
    rng: &mut StdRng,
    informed: bool,
) -> Outcome {
    let mut state = SearchState::new(resource);

    if walk(topology, &mut state, rng, start, ttl, informed) {
        if informed {
            state.propagate_cache(topology);
        }
    } else {
        state.status = SearchStatus::Exhausted;
    }

    debug!(
        "Random walk for {} from {} finished: {:?}, {} messages, {} nodes",
        resource,
        topology.node(start).id(),
        state.status,
        state.messages,
        state.visited.len()
    );
    state.into_outcome(topology)
}

/// A node the walker is standing on, with the neighbors it still may try
struct Frame {
    node: NodeIndex,
    remaining: Ttl,
    neighbors: Vec<NodeIndex>,
    cursor: usize,
}

/// What happened when the walker entered a node
enum Entry {
    Hit,
    Spent,
    Forward(Frame),
}

/// Visit `node`, test it for a hit, and shuffle its neighbors if it may forward
fn enter<R: Rng + ?Sized>(
    topology: &Topology,
    state: &mut SearchState<'_>,
    rng: &mut R,
    node: NodeIndex,
    remaining: Ttl,
) -> Entry {
    state.visit(node);

    if topology.node(node).hosts(state.resource) {
        return Entry::Hit;
    }

    if !remaining.can_forward() {
        return Entry::Spent;
    }

    let mut neighbors: Vec<NodeIndex> = topology.node(node).neighbors().iter().copied().collect();
    neighbors.shuffle(rng);
    Entry::Forward(Frame {
        node,
        remaining,
        neighbors,
        cursor: 0,
    })
}

/// Walk from `start` until a hit or until every admissible step is spent.
///
/// The frames on the stack are the current path. A frame whose neighbors are
/// used up is popped and its parent moves on to its next neighbor.
fn walk<R: Rng + ?Sized>(
    topology: &Topology,
    state: &mut SearchState<'_>,
    rng: &mut R,
    start: NodeIndex,
    ttl: Ttl,
    informed: bool,
) -> bool {
    let mut stack = match enter(topology, state, rng, start, ttl) {
        Entry::Hit => {
            state.found(start, vec![start]);
            return true;
        }
        Entry::Spent => return false,
        Entry::Forward(frame) => vec![frame],
    };

    while let Some(frame) = stack.last_mut() {
        if frame.cursor == frame.neighbors.len() {
            stack.pop();
            continue;
        }
        let neighbor = frame.neighbors[frame.cursor];
        frame.cursor += 1;
        let (current, remaining) = (frame.node, frame.remaining);

        if state.is_visited(neighbor) {
            continue;
        }

        state.messages += 1;
        trace!(
            "{} -> {} (ttl {})",
            topology.node(current).id(),
            topology.node(neighbor).id(),
            remaining
        );

        let mut next = neighbor;
        if informed {
            if let Some(target) = topology.node(neighbor).locate_cached(state.resource) {
                debug!(
                    "{} knows {} is at {}, jumping there",
                    topology.node(neighbor).id(),
                    state.resource,
                    topology.node(target).id()
                );
                state.visit(neighbor);
                next = target;
            }
        }

        match enter(topology, state, rng, next, remaining.decrement()) {
            Entry::Hit => {
                let mut path: Vec<NodeIndex> = stack.iter().map(|f| f.node).collect();
                path.push(next);
                state.found(next, path);
                return true;
            }
            Entry::Spent => {}
            Entry::Forward(frame) => stack.push(frame),
        }
    }

    false
}
