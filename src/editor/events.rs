use crate::graph::{ConnectionId, NodeId, Position};
use std::sync::mpsc::Sender;

/// Something observable happened in an editing session.
///
/// Events carry ids and values only; turning them into user-facing text is up to the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    NodeAdded {
        id: NodeId,
        kind: String,
    },
    NodeRemoved {
        id: NodeId,
        kind: String,
    },
    NodeMoved {
        id: NodeId,
        from: Position,
        to: Position,
    },
    NodeUpdated {
        id: NodeId,
        field: String,
    },
    ConnectionAdded {
        id: ConnectionId,
        from: NodeId,
        to: NodeId,
    },
    ConnectionRemoved {
        id: ConnectionId,
    },
    SelectionChanged {
        selected: Vec<NodeId>,
    },
    SelectionCleared,
    Undone,
    Redone,
    StateImported {
        nodes: usize,
        connections: usize,
    },
}

impl EditorEvent {
    /// Stable event name, as used by notification layers.
    pub fn name(&self) -> &'static str {
        match self {
            EditorEvent::NodeAdded { .. } => "nodeAdded",
            EditorEvent::NodeRemoved { .. } => "nodeRemoved",
            EditorEvent::NodeMoved { .. } => "nodeMoved",
            EditorEvent::NodeUpdated { .. } => "nodeUpdated",
            EditorEvent::ConnectionAdded { .. } => "connectionAdded",
            EditorEvent::ConnectionRemoved { .. } => "connectionRemoved",
            EditorEvent::SelectionChanged { .. } => "selectionChanged",
            EditorEvent::SelectionCleared => "selectionCleared",
            EditorEvent::Undone => "undone",
            EditorEvent::Redone => "redone",
            EditorEvent::StateImported { .. } => "stateImported",
        }
    }
}

/// A subscriber to session events.
pub trait EventSink: Send {
    fn emit(&mut self, event: &EditorEvent);
}

impl EventSink for Sender<EditorEvent> {
    fn emit(&mut self, event: &EditorEvent) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.send(event.clone());
    }
}
