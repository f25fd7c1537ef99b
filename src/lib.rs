//! # Overlay Search - resource discovery over peer-to-peer overlays
//!
//! This library models a peer-to-peer overlay network as an undirected graph
//! and simulates how a query for a resource travels through it.
//!
//! ## Overview
//!
//! A topology is built once from a JSON description, validated once, and then
//! searched any number of times. Four strategies are available, each bounded
//! by a hop budget (TTL):
//!
//! - **flooding**: breadth-first propagation to every neighbor
//! - **informed_flooding**: flooding that jumps through cached resource locations
//! - **random_walk**: a single query copy wandering to unvisited neighbors
//! - **informed_random_walk**: a random walk that jumps through cached locations
//!
//! The informed strategies cache `resource -> finder` along each successful
//! path, so later searches get cheaper.
//!
//! ## Architecture
//!
//! - `config`: description file loading and field whitelist
//! - `topology`: node arena, link and resource mutation, structural validation
//! - `search`: the strategies, their shared bookkeeping, and the dispatcher
//! - `report`: text and JSON rendering of results
//! - `shell`: interactive prompt loop
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use overlay_search::{config, search, topology::Topology};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let description = config::load_description("network.json".as_ref())?;
//! let mut topology = Topology::from_description(&description)?;
//! topology.check()?;
//!
//! let mut dispatcher = search::Dispatcher::new(
//!     search::StrategyRegistry::standard(),
//!     StdRng::seed_from_u64(7),
//! );
//! let report = dispatcher.execute(
//!     &mut topology,
//!     "flooding",
//!     [("node", "n1"), ("resource", "f"), ("ttl", "2")],
//! )?;
//! println!("found: {}", report.outcome.is_found());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Each module reports its own `thiserror` enum (`InputError`,
//! `TopologyError`, `SearchError`). The binary wraps them with `color_eyre`
//! for context-rich reporting.

pub mod config;
pub mod report;
pub mod search;
pub mod shell;
pub mod topology;

pub use config::{load_description, InputError, NetworkDescription};
pub use search::{Dispatcher, Outcome, SearchError, SearchReport, Strategy, StrategyRegistry, Ttl};
pub use topology::{Node, NodeIndex, Topology, TopologyError};
