//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the botflo_editor crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use botflo_editor::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let config = EditorConfig::from_file("path/to/editor.json")?;
//! let mut session = EditorSession::new(NodeCatalog::default(), config);
//!
//! let document = FlowDocument::from_file("path/to/flow.json")?;
//! session.import_state(document)?;
//!
//! let view = RenderBridge::default().project(&session);
//! println!("{} nodes, {} edges", view.nodes.len(), view.edges.len());
//! # Ok(())
//! # }
//! ```

// Session and its collaborators
pub use crate::config::EditorConfig;
pub use crate::editor::{EditorEvent, EditorSession, EventSink};
pub use crate::history::{HistoryStack, Snapshot};
pub use crate::selection::{SelectionManager, SelectionState};

// Graph model
pub use crate::graph::{
    Connection, ConnectionId, ConnectionPolicy, FieldValue, Node, NodeData, NodeId, Position,
    Rect, Size,
};

// Node types
pub use crate::catalog::{CustomKind, FieldSpec, NodeCatalog, NodeKind, ValidationReport, Widget};

// Surfaces
pub use crate::bridge::{Key, Modifiers, PropertyEditor, RenderBridge, SurfaceView, Viewport};

// Persistence
pub use crate::document::{
    BotSettings, FlowDocument, IntoFlowDocument, Template, TemplateLibrary,
};

// Error types
pub use crate::error::{ConfigError, ConversionError, DocumentError, EditorError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
