//! The editing session: one flow's nodes, connections, history and selection.

mod events;
mod session;

pub use events::*;
pub use session::*;
