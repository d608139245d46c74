//! Serializable flow documents: the persistence contract of an editing session.

use crate::catalog::NodeCatalog;
use crate::error::{ConversionError, DocumentError};
use crate::graph::{Connection, Node};
use crate::history::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

mod template;

pub use template::*;

/// Format version written by this crate.
pub const DOCUMENT_VERSION: &str = "1.0";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// Bot-level settings carried alongside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BotSettings {
    pub welcome_message: String,
    pub fallback_message: String,
    pub theme: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            welcome_message: "Hello! How can I help you today?".to_string(),
            fallback_message: "I didn't understand that. Could you try again?".to_string(),
            theme: "default".to_string(),
        }
    }
}

/// A plain, storage-agnostic copy of a flow: what `export_state` produces and `import_state` consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDocument {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub settings: BotSettings,
}

impl FlowDocument {
    /// An empty document stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            exported_at: Utc::now(),
            nodes: Vec::new(),
            connections: Vec::new(),
            settings: BotSettings::default(),
        }
    }

    /// The graph part of the document, as a history entry.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Saves the document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), nodes = self.nodes.len(), "flow document saved");
        Ok(())
    }

    /// Loads a document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

/// A trait for custom flow formats that can be turned into a `FlowDocument`.
///
/// This is the extension point for loading flows that were not written by
/// this crate: implement it on your own structs and hand the result to
/// `EditorSession::import_state`. The catalog is provided so default payloads
/// can be filled in.
///
/// # Example
///
/// ```rust,no_run
/// use botflo_editor::prelude::*;
///
/// struct Greeting {
///     text: String,
/// }
///
/// impl IntoFlowDocument for Greeting {
///     fn into_document(
///         self,
///         catalog: &NodeCatalog,
///     ) -> std::result::Result<FlowDocument, ConversionError> {
///         let kind = catalog
///             .get("message")
///             .ok_or_else(|| ConversionError::ValidationError("no message type".into()))?;
///         let mut data = kind.default_data();
///         data.insert("content".into(), self.text.into());
///
///         let mut document = FlowDocument::new("Greeting");
///         document.nodes.push(Node::new("node_1", "message", Position::new(0, 0), data));
///         Ok(document)
///     }
/// }
/// ```
pub trait IntoFlowDocument {
    /// Consumes the value and converts it into a flow document.
    fn into_document(self, catalog: &NodeCatalog) -> Result<FlowDocument, ConversionError>;
}

impl IntoFlowDocument for FlowDocument {
    fn into_document(self, _catalog: &NodeCatalog) -> Result<FlowDocument, ConversionError> {
        Ok(self)
    }
}
