//! Resource discovery over an overlay topology.
//!
//! This module provides blind and informed flooding, blind and informed
//! random walks, and the dispatcher that selects one by name.

pub mod dispatch;
pub mod flooding;
pub mod random_walk;
pub mod types;

pub use dispatch::{
    millis, parse_ttl, timed, Dispatcher, SearchError, SearchFn, SearchParams, SearchReport,
    StrategyRegistry,
};
pub use flooding::{flooding, informed_flooding};
pub use random_walk::{informed_random_walk, random_walk};
pub use types::{Outcome, SearchState, SearchStatus, Strategy, Ttl};
