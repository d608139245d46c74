//! # Botflo Editor - Conversation Flow Graph Editing Core
//!
//! **Botflo Editor** is the editing core of a visual chatbot builder. A bot's
//! conversation is a directed graph: nodes are steps (send a message, ask a
//! question, branch on a condition, hand over to a human) and connections say
//! which step follows which. This crate owns that graph while a user edits
//! it, and leaves drawing it to whoever embeds the crate.
//!
//! ## Core Workflow
//!
//! Everything happens inside an [`EditorSession`](editor::EditorSession):
//!
//! 1.  **Pick Node Types**: Build a `NodeCatalog` with the built-in kinds, aliases, or your own `NodeKind`s.
//! 2.  **Open a Session**: `EditorSession::new(catalog, config)` records an empty baseline so the first edit is undoable.
//! 3.  **Edit**: Create, update, move, connect and delete nodes. Every edit is one undo step.
//! 4.  **Drive a Surface**: The `RenderBridge` turns pointer and key input into session calls and projects
//!     the graph into plain `SurfaceView` data. The `PropertyEditor` does the same for the selected node's form.
//! 5.  **Persist**: `export_state` produces a `FlowDocument` that can be saved as JSON and imported later.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use botflo_editor::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut session = EditorSession::new(NodeCatalog::default(), EditorConfig::default());
//!
//!     // Two steps and a link between them
//!     let welcome = session.create_node("message", Position::new(10, 10))?;
//!     let menu = session.create_node("question", Position::new(50, 50))?;
//!     session.connect(welcome.id(), menu.id(), "default", "default")?;
//!
//!     // Edit the greeting, then change our mind
//!     session.update_field(welcome.id(), "content", "Hi there!")?;
//!     session.undo();
//!
//!     // Validation is advisory and never blocks an edit
//!     for (id, report) in session.validate_all() {
//!         println!("{id}: {report}");
//!     }
//!
//!     // Persist the flow
//!     let document = session.export_state();
//!     document.save("flow.json")?;
//!
//!     // Or start over from a built-in template
//!     let library = TemplateLibrary::builtin();
//!     if let Some(template) = library.get("customer-service") {
//!         session.load_template(template)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod catalog;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod graph;
pub mod history;
pub mod prelude;
pub mod selection;
