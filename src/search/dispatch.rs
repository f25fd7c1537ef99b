//! Strategy selection and execution.
//!
//! The [`Dispatcher`] resolves a strategy name through a
//! [`StrategyRegistry`], validates the raw request parameters, normalizes the
//! TTL token, and times the run.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Serialize, Serializer};

use super::flooding::{flooding, informed_flooding};
use super::random_walk::{informed_random_walk, random_walk};
use super::types::{Outcome, Strategy, Ttl};
use crate::topology::{NodeIndex, Topology, TopologyError};

/// Signature shared by every strategy implementation
pub type SearchFn = fn(&mut Topology, NodeIndex, &str, Ttl, &mut StdRng) -> Outcome;

/// Parameter names accepted by a search request
pub const PARAM_NODE: &str = "node";
pub const PARAM_RESOURCE: &str = "resource";
pub const PARAM_TTL: &str = "ttl";

/// Errors raised while selecting or running a search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search algorithm '{name}', available: {available}")]
    InvalidAlgorithm { name: String, available: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl Strategy {
    /// Implementation behind each strategy
    pub fn search_fn(self) -> SearchFn {
        match self {
            Strategy::Flooding => flooding,
            Strategy::InformedFlooding => informed_flooding,
            Strategy::RandomWalk => random_walk,
            Strategy::InformedRandomWalk => informed_random_walk,
        }
    }
}

/// The strategies a dispatcher may run, in presentation order
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Registry holding all four strategies
    pub fn standard() -> Self {
        Self {
            strategies: Strategy::ALL.to_vec(),
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Look up a strategy by its request name
    pub fn resolve(&self, name: &str) -> Result<Strategy, SearchError> {
        self.strategies
            .iter()
            .copied()
            .find(|s| s.name() == name)
            .ok_or_else(|| SearchError::InvalidAlgorithm {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Normalize a raw TTL token.
///
/// An absent or empty token means unbounded. Anything other than a
/// non-negative integer is rejected.
pub fn parse_ttl(token: Option<&str>) -> Result<Ttl, SearchError> {
    let token = token.map(str::trim).unwrap_or("");
    if token.is_empty() {
        return Ok(Ttl::Unbounded);
    }

    token
        .parse::<u32>()
        .map(Ttl::Bounded)
        .map_err(|_| {
            SearchError::InvalidParameter(format!(
                "ttl must be a non-negative integer, got '{}'",
                token
            ))
        })
}

/// Validated parameters of a search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub node: String,
    pub resource: String,
    pub ttl: Ttl,
}

impl SearchParams {
    pub fn new(node: impl Into<String>, resource: impl Into<String>, ttl: Ttl) -> Self {
        Self {
            node: node.into(),
            resource: resource.into(),
            ttl,
        }
    }

    /// Build parameters from raw name/value pairs.
    ///
    /// `node` and `resource` are required, `ttl` is optional. Unknown or
    /// repeated names are rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut node: Option<String> = None;
        let mut resource: Option<String> = None;
        let mut ttl: Option<String> = None;

        for (key, value) in pairs {
            let key = key.as_ref();
            let slot = match key {
                PARAM_NODE => &mut node,
                PARAM_RESOURCE => &mut resource,
                PARAM_TTL => &mut ttl,
                _ => {
                    return Err(SearchError::InvalidParameter(format!(
                        "unknown parameter '{}', expected {}, {} and optionally {}",
                        key, PARAM_NODE, PARAM_RESOURCE, PARAM_TTL
                    )))
                }
            };
            if slot.replace(value.into()).is_some() {
                return Err(SearchError::InvalidParameter(format!(
                    "parameter '{}' given more than once",
                    key
                )));
            }
        }

        let node = node.ok_or_else(|| missing(PARAM_NODE))?;
        let resource = resource.ok_or_else(|| missing(PARAM_RESOURCE))?;
        let ttl = parse_ttl(ttl.as_deref())?;

        Ok(Self { node, resource, ttl })
    }
}

fn missing(name: &str) -> SearchError {
    SearchError::InvalidParameter(format!("missing parameter '{}'", name))
}

/// Run a closure and measure how long it took
pub fn timed<T, F: FnOnce() -> T>(f: F) -> (T, Duration) {
    let started = Instant::now();
    let value = f();
    (value, started.elapsed())
}

/// Duration in fractional milliseconds
pub fn millis(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1_000_000.0
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(millis(*elapsed))
}

/// Outcome of a dispatched search together with what was asked
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub algorithm: Strategy,
    pub start: String,
    pub resource: String,
    pub ttl: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Executes search requests against a topology
#[derive(Debug)]
pub struct Dispatcher {
    registry: StrategyRegistry,
    rng: StdRng,
}

impl Dispatcher {
    pub fn new(registry: StrategyRegistry, rng: StdRng) -> Self {
        Self { registry, rng }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Resolve `algorithm`, validate the raw parameters, and run the search
    pub fn execute<I, K, V>(
        &mut self,
        topology: &mut Topology,
        algorithm: &str,
        params: I,
    ) -> Result<SearchReport, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let strategy = self.registry.resolve(algorithm)?;
        let params = SearchParams::from_pairs(params)?;
        self.run(topology, strategy, &params)
    }

    /// Run an already resolved strategy
    pub fn run(
        &mut self,
        topology: &mut Topology,
        strategy: Strategy,
        params: &SearchParams,
    ) -> Result<SearchReport, SearchError> {
        let start = topology.resolve(&params.node)?;
        let search = strategy.search_fn();

        let rng = &mut self.rng;
        let (outcome, elapsed) =
            timed(|| search(topology, start, &params.resource, params.ttl, rng));

        info!(
            "{} for {} from {} (ttl {}) finished in {:?}: found={}",
            strategy,
            params.resource,
            params.node,
            params.ttl,
            elapsed,
            outcome.is_found()
        );
        if strategy.is_informed() {
            if let Some(finder) = &outcome.found_at {
                debug!("{} nodes now cache {} at {}", outcome.path.len(), params.resource, finder);
            }
        }

        Ok(SearchReport {
            algorithm: strategy,
            start: params.node.clone(),
            resource: params.resource.clone(),
            ttl: params.ttl.to_string(),
            outcome,
            elapsed,
        })
    }

    /// Run every registered strategy, in order, with the same parameters
    pub fn compare(
        &mut self,
        topology: &mut Topology,
        params: &SearchParams,
    ) -> Result<Vec<SearchReport>, SearchError> {
        let strategies = self.registry.strategies().to_vec();
        strategies
            .into_iter()
            .map(|strategy| self.run(topology, strategy, params))
            .collect()
    }
}
