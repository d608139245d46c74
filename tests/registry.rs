//! Tests for the node and connection registries used on their own.
use botflo_editor::graph::{ConnectionRegistry, NodeRegistry};
use botflo_editor::prelude::*;

fn registry_with(kinds: &[&str]) -> (NodeCatalog, NodeRegistry, Vec<NodeId>) {
    let catalog = NodeCatalog::default();
    let mut nodes = NodeRegistry::new();
    let ids = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            nodes
                .create(&catalog, kind, Position::new(i as i32 * 100, 0))
                .unwrap()
                .id()
                .clone()
        })
        .collect();
    (catalog, nodes, ids)
}

#[test]
fn test_list_keeps_insertion_order() {
    let (_, mut nodes, ids) = registry_with(&["delay", "message", "condition"]);
    assert_eq!(nodes.ids().cloned().collect::<Vec<_>>(), ids);

    nodes.remove(&ids[1]);
    let kinds: Vec<&str> = nodes.list().map(|n| n.kind()).collect();
    assert_eq!(kinds, vec!["delay", "condition"]);
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_find_by_kind() {
    let (_, nodes, ids) = registry_with(&["message", "question", "message"]);
    let found: Vec<&NodeId> = nodes.find_by_kind("message").map(|n| n.id()).collect();
    assert_eq!(found, vec![&ids[0], &ids[2]]);
    assert_eq!(nodes.find_by_kind("handover").count(), 0);
}

#[test]
fn test_update_field_returns_previous() {
    let (_, mut nodes, ids) = registry_with(&["setvariable"]);
    let previous = nodes
        .update_field(&ids[0], "variable", "score".into())
        .unwrap();
    assert_eq!(previous, Some(FieldValue::from("variable_name")));

    let previous = nodes
        .update_field(&ids[0], "note", "fresh".into())
        .unwrap();
    assert_eq!(previous, None);
}

#[test]
fn test_set_position_returns_previous() {
    let (_, mut nodes, ids) = registry_with(&["message", "message"]);
    let previous = nodes.set_position(&ids[1], Position::new(7, 8)).unwrap();
    assert_eq!(previous, Position::new(100, 0));
    assert!(
        nodes
            .set_position(&NodeId::new("node_99"), Position::new(0, 0))
            .is_err()
    );
}

#[test]
fn test_create_with_data_checks_kind() {
    let catalog = NodeCatalog::default();
    let mut nodes = NodeRegistry::new();
    let err = nodes
        .create_with_data(&catalog, "ghost", Position::new(0, 0), NodeData::new())
        .unwrap_err();
    assert_eq!(err, EditorError::UnknownType("ghost".to_string()));

    let node = nodes
        .create_with_data(&catalog, "delay", Position::new(0, 0), NodeData::new())
        .unwrap();
    assert!(node.data.is_empty());
    assert_eq!(node.title(), node.id().as_str());
}

#[test]
fn test_connections_of_in_insertion_order() {
    let (_, nodes, ids) = registry_with(&["message", "question", "condition"]);
    let mut connections = ConnectionRegistry::default();
    let a = connections
        .connect(&nodes, &ids[0], &ids[1], "default", "default")
        .unwrap();
    let b = connections
        .connect(&nodes, &ids[2], &ids[1], "true", "default")
        .unwrap();
    connections
        .connect(&nodes, &ids[0], &ids[2], "default", "default")
        .unwrap();

    let of_middle: Vec<&ConnectionId> = connections
        .connections_of(&ids[1])
        .into_iter()
        .map(|c| &c.id)
        .collect();
    assert_eq!(of_middle, vec![&a.id, &b.id]);
}

#[test]
fn test_remove_touching_returns_removed() {
    let (_, nodes, ids) = registry_with(&["message", "question", "condition"]);
    let mut connections = ConnectionRegistry::default();
    connections
        .connect(&nodes, &ids[0], &ids[1], "default", "default")
        .unwrap();
    connections
        .connect(&nodes, &ids[1], &ids[2], "option", "default")
        .unwrap();
    connections
        .connect(&nodes, &ids[0], &ids[2], "default", "default")
        .unwrap();

    let removed = connections.remove_touching(&ids[1]);
    assert_eq!(removed.len(), 2);
    assert_eq!(connections.len(), 1);
    assert!(connections.remove_touching(&ids[1]).is_empty());
}

#[test]
fn test_policy_rejects_parallel_edges() {
    let (_, nodes, ids) = registry_with(&["message", "question"]);
    let mut connections = ConnectionRegistry::new(ConnectionPolicy {
        allow_parallel: false,
        allow_self_loops: true,
    });
    connections
        .connect(&nodes, &ids[0], &ids[1], "default", "default")
        .unwrap();

    let err = connections
        .connect(&nodes, &ids[0], &ids[1], "default", "default")
        .unwrap_err();
    assert!(matches!(err, EditorError::ConnectionRejected { .. }));
    assert_eq!(connections.len(), 1);

    // A different port is not parallel
    connections
        .connect(&nodes, &ids[0], &ids[1], "default", "secondary")
        .unwrap();
    assert_eq!(connections.len(), 2);
}

#[test]
fn test_policy_rejects_self_loops() {
    let (_, nodes, ids) = registry_with(&["message"]);
    let mut connections = ConnectionRegistry::new(ConnectionPolicy {
        allow_parallel: true,
        allow_self_loops: false,
    });
    let err = connections
        .connect(&nodes, &ids[0], &ids[0], "default", "default")
        .unwrap_err();
    assert!(err.to_string().contains("self connections"));
    assert!(connections.is_empty());
}

#[test]
fn test_rejected_connect_does_not_consume_an_id() {
    let (_, nodes, ids) = registry_with(&["message", "question"]);
    let mut connections = ConnectionRegistry::new(ConnectionPolicy {
        allow_parallel: false,
        allow_self_loops: false,
    });
    let _ = connections.connect(&nodes, &ids[0], &ids[0], "default", "default");
    let ok = connections
        .connect(&nodes, &ids[0], &ids[1], "default", "default")
        .unwrap();
    assert_eq!(ok.id.as_str(), "conn_1");
}
