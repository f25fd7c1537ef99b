//! Network description loading.
//!
//! A description is a JSON object naming the node count, the degree bounds,
//! and which node hosts which resources and links to which peers:
//!
//! ```json
//! {
//!   "num_nodes": 4,
//!   "min_neighbors": 2,
//!   "max_neighbors": 2,
//!   "resources": { "n3": ["f"] },
//!   "edges": { "n1": ["n2", "n4"], "n3": ["n2", "n4"] }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

/// Fields accepted at the top level of a description file
pub const VALID_FIELDS: [&str; 5] = [
    "num_nodes",
    "min_neighbors",
    "max_neighbors",
    "resources",
    "edges",
];

/// Parsed network description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub num_nodes: usize,
    pub min_neighbors: usize,
    pub max_neighbors: usize,
    /// Node id -> hosted resource ids
    #[serde(default)]
    pub resources: BTreeMap<String, Vec<String>>,
    /// Node id -> neighbor ids
    #[serde(default)]
    pub edges: BTreeMap<String, Vec<String>>,
}

/// Errors that can occur while reading a description file
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Input file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Input file is not a .json file: {}", path.display())]
    NotJson { path: PathBuf },

    #[error(
        "Unknown fields in input file: {}; accepted fields are: {}",
        fields.join(", "),
        VALID_FIELDS.join(", ")
    )]
    InvalidOptions { fields: Vec<String> },

    #[error("Invalid input value: {0}")]
    InvalidValue(String),

    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse input file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NetworkDescription {
    /// Parse a description from JSON text, enforcing the field whitelist
    pub fn from_json_str(content: &str) -> Result<Self, InputError> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        let object = value
            .as_object()
            .ok_or_else(|| {
                InputError::InvalidValue("top level must be a JSON object".to_string())
            })?;

        let mut unknown: Vec<String> = object
            .keys()
            .filter(|key| !VALID_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(InputError::InvalidOptions { fields: unknown });
        }

        let description: NetworkDescription = serde_json::from_value(value)?;
        description.validate()?;
        Ok(description)
    }

    /// Check value ranges the JSON schema cannot express
    pub fn validate(&self) -> Result<(), InputError> {
        if self.num_nodes == 0 {
            return Err(InputError::InvalidValue(
                "num_nodes must be greater than zero".to_string(),
            ));
        }

        if self.min_neighbors > self.max_neighbors {
            return Err(InputError::InvalidValue(format!(
                "min_neighbors ({}) cannot exceed max_neighbors ({})",
                self.min_neighbors, self.max_neighbors
            )));
        }

        Ok(())
    }
}

/// Load and parse a description from a `.json` file
pub fn load_description(path: &Path) -> Result<NetworkDescription, InputError> {
    info!("Loading network description from: {:?}", path);

    if !path.is_file() {
        return Err(InputError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    if path.extension().map_or(true, |ext| ext != "json") {
        return Err(InputError::NotJson {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let description = NetworkDescription::from_json_str(&content)?;

    info!(
        "Description declares {} nodes, degree bounds [{}, {}]",
        description.num_nodes, description.min_neighbors, description.max_neighbors
    );
    Ok(description)
}
