use crate::error::ConfigError;
use crate::graph::{ConnectionPolicy, Position, Size};
use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for an editing session. Every field is optional in the JSON form.
///
/// ```json
/// { "history_limit": 100, "connection_policy": { "allow_parallel": false } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of retained history entries, including the baseline.
    pub history_limit: usize,
    pub connection_policy: ConnectionPolicy,
    /// Offset applied to duplicated and pasted nodes.
    pub duplicate_offset: Position,
    /// Rendered size of a node, used for region queries and bounds.
    pub node_size: Size,
    /// Characters kept in a node preview line before it is cut off with `...`.
    pub preview_length: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            connection_policy: ConnectionPolicy::default(),
            duplicate_offset: Position::new(50, 50),
            node_size: Size::default(),
            preview_length: 50,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}
