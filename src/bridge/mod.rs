//! Adapters between an `EditorSession` and whatever draws it.
//!
//! Nothing here produces markup. The render bridge turns pointer and key
//! input into session calls and projects the session into plain view data;
//! the property bridge does the same for the form of the selected node.

mod keyboard;
mod properties;
mod render;

pub use keyboard::*;
pub use properties::*;
pub use render::*;
