//! Common test utilities for building sessions and small flows.
use botflo_editor::prelude::*;
use std::sync::mpsc::{self, Receiver};

/// A session with the built-in catalog and default config.
#[allow(dead_code)]
pub fn new_session() -> EditorSession {
    EditorSession::new(NodeCatalog::default(), EditorConfig::default())
}

/// A session whose events are captured on the returned receiver.
#[allow(dead_code)]
pub fn observed_session() -> (EditorSession, Receiver<EditorEvent>) {
    let mut session = new_session();
    let (tx, rx) = mpsc::channel();
    session.subscribe(tx);
    (session, rx)
}

/// Builds `message (10,10) -> question (50,50)` on default ports.
///
/// Takes three snapshots: two creates and one connect.
#[allow(dead_code)]
pub fn create_two_node_flow(session: &mut EditorSession) -> (NodeId, NodeId, ConnectionId) {
    let n1 = session
        .create_node("message", Position::new(10, 10))
        .unwrap();
    let n2 = session
        .create_node("question", Position::new(50, 50))
        .unwrap();
    let c = session
        .connect(n1.id(), n2.id(), "default", "default")
        .unwrap();
    (n1.id().clone(), n2.id().clone(), c.id)
}

/// Names of all events received so far.
#[allow(dead_code)]
pub fn drain_event_names(rx: &Receiver<EditorEvent>) -> Vec<&'static str> {
    rx.try_iter().map(|e| e.name()).collect()
}

/// A small hand-written document: greeting -> handover.
#[allow(dead_code)]
pub fn create_simple_document() -> FlowDocument {
    let catalog = NodeCatalog::default();
    let mut greeting = catalog.get("message").unwrap().default_data();
    greeting.insert("content".to_string(), "Hi!".into());
    let handover = catalog.get("handover").unwrap().default_data();

    let mut document = FlowDocument::new("Simple Bot");
    document.nodes = vec![
        Node::new("node_7", "message", Position::new(0, 0), greeting),
        Node::new("node_9", "handover", Position::new(300, 0), handover),
    ];
    document.connections = vec![Connection {
        id: ConnectionId::new("conn_4"),
        from: NodeId::new("node_7"),
        to: NodeId::new("node_9"),
        from_port: "default".to_string(),
        to_port: "default".to_string(),
    }];
    document
}
