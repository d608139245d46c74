//! Tests for export/import, document files and templates.
mod common;
use botflo_editor::document::{TemplateLink, TemplateNode};
use botflo_editor::prelude::*;
use common::*;
use tempfile::tempdir;

#[test]
fn test_export_is_a_deep_copy() {
    let mut session = new_session();
    let (n1, _, _) = create_two_node_flow(&mut session);
    let document = session.export_state();

    session.update_field(&n1, "content", "later").unwrap();
    assert_ne!(
        document.nodes[0].field("content"),
        session.node(&n1).unwrap().field("content")
    );
    assert_eq!(document.version, "1.0");
    assert_eq!(document.name, "Untitled Bot");
}

#[test]
fn test_import_replaces_state_in_one_step() {
    let (mut session, rx) = observed_session();
    create_two_node_flow(&mut session);
    session.select_all();
    rx.try_iter().count();
    let history_len = session.history().len();

    session.import_state(create_simple_document()).unwrap();

    assert_eq!(session.name(), "Simple Bot");
    assert_eq!(session.nodes().len(), 2);
    assert!(session.node(&NodeId::new("node_7")).is_some());
    assert_eq!(session.connections_of(&NodeId::new("node_9")).len(), 1);
    assert!(session.selection().is_empty());
    assert_eq!(session.history().len(), history_len + 1);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![EditorEvent::StateImported {
            nodes: 2,
            connections: 1
        }]
    );

    // Imported ids are never handed out again
    let fresh = session.create_node("message", Position::new(0, 0)).unwrap();
    assert_eq!(fresh.id().as_str(), "node_10");
    let link = session
        .connect(fresh.id(), &NodeId::new("node_7"), "default", "default")
        .unwrap();
    assert_eq!(link.id.as_str(), "conn_5");

    // And the import itself is undoable
    session.undo();
    session.undo();
    session.undo();
    assert!(session.node(&NodeId::new("node_7")).is_none());
    assert_eq!(session.nodes().len(), 2);
}

#[test]
fn test_import_failure_leaves_session_untouched() {
    let mut session = new_session();
    create_two_node_flow(&mut session);
    let before = session.export_state();
    let history_len = session.history().len();

    let mut unknown_kind = create_simple_document();
    unknown_kind.nodes.push(Node::new(
        "node_11",
        "carrier_pigeon",
        Position::new(0, 0),
        NodeData::new(),
    ));
    assert_eq!(
        session.import_state(unknown_kind).unwrap_err(),
        EditorError::UnknownType("carrier_pigeon".to_string())
    );

    let mut duplicate_id = create_simple_document();
    let copy = duplicate_id.nodes[0].clone();
    duplicate_id.nodes.push(copy);
    assert!(matches!(
        session.import_state(duplicate_id).unwrap_err(),
        EditorError::InvalidDocument(_)
    ));

    let mut dangling = create_simple_document();
    dangling.connections[0].to = NodeId::new("node_404");
    let err = session.import_state(dangling).unwrap_err();
    assert!(err.to_string().contains("node_404"));

    let after = session.export_state();
    assert_eq!(after.nodes, before.nodes);
    assert_eq!(after.connections, before.connections);
    assert_eq!(session.name(), before.name);
    assert_eq!(session.history().len(), history_len);
}

#[test]
fn test_import_rejects_ids_at_the_end_of_the_counter() {
    let mut session = new_session();
    let history_len = session.history().len();

    let mut last_node = create_simple_document();
    last_node.nodes.push(Node::new(
        "node_18446744073709551615",
        "message",
        Position::new(0, 0),
        NodeData::new(),
    ));
    let err = session.import_state(last_node).unwrap_err();
    assert!(matches!(err, EditorError::InvalidDocument(_)));
    assert!(err.to_string().contains("node_18446744073709551615"));

    let mut last_connection = create_simple_document();
    last_connection.connections[0].id = ConnectionId::new("conn_18446744073709551615");
    assert!(matches!(
        session.import_state(last_connection).unwrap_err(),
        EditorError::InvalidDocument(_)
    ));

    assert!(session.nodes().is_empty());
    assert_eq!(session.history().len(), history_len);
}

#[test]
fn test_exhausted_id_counter_is_an_error() {
    let mut session = new_session();
    let mut document = create_simple_document();
    document.nodes[0] = Node::new(
        "node_18446744073709551614",
        "message",
        Position::new(0, 0),
        NodeData::new(),
    );
    document.connections[0].from = NodeId::new("node_18446744073709551614");
    document.connections[0].id = ConnectionId::new("conn_18446744073709551614");
    session.import_state(document).unwrap();

    let last = session.create_node("message", Position::new(0, 0)).unwrap();
    assert_eq!(last.id().as_str(), "node_18446744073709551615");
    let history_len = session.history().len();
    assert_eq!(
        session
            .create_node("message", Position::new(0, 0))
            .unwrap_err(),
        EditorError::IdsExhausted("node_")
    );
    assert_eq!(session.nodes().len(), 3);
    assert_eq!(session.history().len(), history_len);

    let handover = NodeId::new("node_9");
    let link = session
        .connect(last.id(), &handover, "default", "default")
        .unwrap();
    assert_eq!(link.id.as_str(), "conn_18446744073709551615");
    assert_eq!(
        session
            .connect(last.id(), &handover, "default", "default")
            .unwrap_err(),
        EditorError::IdsExhausted("conn_")
    );
    assert_eq!(session.connections().len(), 2);
}

#[test]
fn test_export_import_round_trip_through_file() {
    let mut session = new_session();
    create_two_node_flow(&mut session);
    session.set_name("Round Trip");
    let exported = session.export_state();

    let dir = tempdir().unwrap();
    let path = dir.path().join("flow.json");
    exported.save(&path).unwrap();
    let loaded = FlowDocument::from_file(&path).unwrap();
    assert_eq!(loaded, exported);

    let mut other = new_session();
    other.import_state(loaded).unwrap();
    assert_eq!(other.name(), "Round Trip");
    assert_eq!(other.export_state().nodes, exported.nodes);
}

#[test]
fn test_document_json_shape() {
    let document = create_simple_document();
    let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();

    assert_eq!(json["nodes"][0]["type"], "message");
    assert_eq!(json["nodes"][0]["data"]["content"], "Hi!");
    assert_eq!(json["connections"][0]["fromPort"], "default");
    assert!(json["exportedAt"].is_string());
    assert!(json["settings"]["welcomeMessage"].is_string());
}

#[test]
fn test_document_from_minimal_json() {
    let json = r#"{
        "name": "Tiny",
        "nodes": [
            { "id": "node_1", "type": "delay", "position": { "x": 5, "y": 6 },
              "data": { "duration": 500, "show_typing": true, "labels": ["a", "b"] } }
        ]
    }"#;
    let document = FlowDocument::from_json(json).unwrap();

    assert_eq!(document.version, "1.0");
    assert!(document.connections.is_empty());
    let node = &document.nodes[0];
    assert_eq!(node.field("duration"), Some(&FieldValue::Number(500.0)));
    assert_eq!(node.field("show_typing"), Some(&FieldValue::Bool(true)));
    assert_eq!(node.field("labels"), Some(&FieldValue::from(vec!["a", "b"])));
}

#[test]
fn test_document_file_errors_carry_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = FlowDocument::from_file(&missing).unwrap_err();
    assert!(matches!(err, DocumentError::Read { .. }));
    assert!(err.to_string().contains("missing.json"));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        FlowDocument::from_file(&broken).unwrap_err(),
        DocumentError::Parse(_)
    ));
}

#[test]
fn test_builtin_templates_are_valid() {
    let library = TemplateLibrary::builtin();
    let ids: Vec<&str> = library.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["customer-service", "lead-generation", "sales", "support"]);

    for template in library.iter() {
        let mut session = new_session();
        session.load_template(template).unwrap();
        assert_eq!(session.nodes().len(), template.nodes.len(), "{}", template.id);
        assert_eq!(
            session.connections().len(),
            template.links.len(),
            "{}",
            template.id
        );
        assert!(
            session.validate_all().is_empty(),
            "template {} has findings: {:?}",
            template.id,
            session.validate_all()
        );
        assert_eq!(session.name(), template.name);
    }
}

#[test]
fn test_template_overrides_defaults() {
    let library = TemplateLibrary::builtin();
    let template = library.get("support").unwrap();
    let document = template.clone().into_document(&NodeCatalog::default()).unwrap();

    let route = &document.nodes[2];
    assert_eq!(route.kind(), "condition");
    assert_eq!(route.field("value"), Some(&FieldValue::from("Live Chat")));
    // Not overridden, so the default stays
    assert_eq!(route.field("operator"), Some(&FieldValue::from("equals")));
    assert_eq!(document.connections[2].from_port, "true");
}

fn broken_template() -> Template {
    Template {
        id: "broken".to_string(),
        name: "Broken".to_string(),
        description: String::new(),
        category: String::new(),
        settings: BotSettings::default(),
        nodes: vec![TemplateNode {
            key: "a".to_string(),
            kind: "message".to_string(),
            position: Position::new(0, 0),
            overrides: NodeData::new(),
        }],
        links: vec![TemplateLink {
            from: "a".to_string(),
            to: "b".to_string(),
            from_port: "default".to_string(),
            to_port: "default".to_string(),
        }],
    }
}

#[test]
fn test_template_conversion_errors() {
    let catalog = NodeCatalog::default();
    assert_eq!(
        broken_template().into_document(&catalog).unwrap_err(),
        ConversionError::DanglingLink("b".to_string())
    );

    let mut unknown = broken_template();
    unknown.nodes[0].kind = "fax".to_string();
    assert!(matches!(
        unknown.into_document(&catalog).unwrap_err(),
        ConversionError::UnknownType { .. }
    ));

    let mut doubled = broken_template();
    doubled.links.clear();
    doubled.nodes.push(doubled.nodes[0].clone());
    assert_eq!(
        doubled.into_document(&catalog).unwrap_err(),
        ConversionError::DuplicateNode("a".to_string())
    );

    let mut session = new_session();
    let err = session.load_template(&broken_template()).unwrap_err();
    assert!(matches!(err, EditorError::Conversion(_)));
    assert!(session.nodes().is_empty());
}

#[test]
fn test_custom_templates_from_json() {
    let json = r#"[{
        "id": "faq",
        "name": "FAQ Bot",
        "nodes": [
            { "key": "hi", "type": "message", "position": { "x": 0, "y": 0 } },
            { "key": "ask", "type": "question", "position": { "x": 300, "y": 0 },
              "overrides": { "options": ["Pricing", "Hours"] } }
        ],
        "links": [ { "from": "hi", "to": "ask" } ]
    }]"#;
    let mut library = TemplateLibrary::from_json(json).unwrap();
    assert_eq!(library.len(), 1);

    let mut session = new_session();
    session.load_template(library.get("faq").unwrap()).unwrap();
    assert_eq!(session.connections().len(), 1);
    let ask = session.nodes().find_by_kind("question").next().unwrap();
    assert_eq!(
        ask.field("options"),
        Some(&FieldValue::from(vec!["Pricing", "Hours"]))
    );

    let mut replacement = library.get("faq").unwrap().clone();
    replacement.name = "FAQ Bot v2".to_string();
    library.insert(replacement);
    assert_eq!(library.len(), 1);
    assert_eq!(library.get("faq").unwrap().name, "FAQ Bot v2");
}

struct LegacyFlow {
    steps: Vec<&'static str>,
}

impl IntoFlowDocument for LegacyFlow {
    fn into_document(
        self,
        catalog: &NodeCatalog,
    ) -> std::result::Result<FlowDocument, ConversionError> {
        let kind = catalog
            .get("message")
            .ok_or_else(|| ConversionError::ValidationError("no message type".to_string()))?;
        let mut document = FlowDocument::new("Legacy");
        for (i, text) in self.steps.iter().enumerate() {
            let mut data = kind.default_data();
            data.insert("content".to_string(), (*text).into());
            document.nodes.push(Node::new(
                format!("node_{}", i + 1),
                "message",
                Position::new(i as i32 * 250, 0),
                data,
            ));
        }
        for i in 1..self.steps.len() {
            document.connections.push(Connection {
                id: ConnectionId::new(format!("conn_{}", i)),
                from: NodeId::new(format!("node_{}", i)),
                to: NodeId::new(format!("node_{}", i + 1)),
                from_port: "default".to_string(),
                to_port: "default".to_string(),
            });
        }
        Ok(document)
    }
}

#[test]
fn test_import_from_custom_format() {
    let mut session = new_session();
    session
        .import_from(LegacyFlow {
            steps: vec!["Hello", "Bye"],
        })
        .unwrap();

    assert_eq!(session.name(), "Legacy");
    assert_eq!(session.connections().len(), 1);
    assert!(session.validate_all().is_empty());
}

#[test]
fn test_config_from_json_and_file() {
    let config = EditorConfig::from_json(
        r#"{ "history_limit": 10, "connection_policy": { "allow_parallel": false } }"#,
    )
    .unwrap();
    assert_eq!(config.history_limit, 10);
    assert!(!config.connection_policy.allow_parallel);
    assert!(config.connection_policy.allow_self_loops);
    assert_eq!(config.duplicate_offset, Position::new(50, 50));

    let dir = tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(&path, r#"{ "preview_length": 12 }"#).unwrap();
    let loaded = EditorConfig::from_file(&path).unwrap();
    assert_eq!(loaded.preview_length, 12);
    assert_eq!(loaded.history_limit, 50);

    assert!(matches!(
        EditorConfig::from_file(dir.path().join("nope.json")).unwrap_err(),
        ConfigError::Read { .. }
    ));
}
