//! Unit tests for values, geometry, the node catalog and errors.
use botflo_editor::catalog::FieldRules;
use botflo_editor::graph::Bounds;
use botflo_editor::prelude::*;

#[test]
fn test_field_value_display() {
    assert_eq!(FieldValue::Number(42.0).to_string(), "42");
    assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
    assert_eq!(FieldValue::Number(-7.0).to_string(), "-7");
    assert_eq!(FieldValue::Number(1e20).to_string(), "100000000000000000000");
    assert_eq!(FieldValue::Number(-1e20).to_string(), "-100000000000000000000");
    assert_eq!(FieldValue::Bool(true).to_string(), "true");
    assert_eq!(FieldValue::Null.to_string(), "null");
    assert_eq!(FieldValue::from(vec!["a", "b"]).to_string(), "a, b");
}

#[test]
fn test_field_value_input_text() {
    assert_eq!(FieldValue::from(vec!["a", "b"]).to_input_text(), "a\nb");
    assert_eq!(FieldValue::Null.to_input_text(), "");
    assert_eq!(FieldValue::from(1500i64).to_input_text(), "1500");
}

#[test]
fn test_field_value_blank() {
    assert!(FieldValue::Null.is_blank());
    assert!(FieldValue::from("   ").is_blank());
    assert!(FieldValue::List(Vec::new()).is_blank());
    assert!(!FieldValue::Bool(false).is_blank());
    assert!(!FieldValue::Number(0.0).is_blank());
}

#[test]
fn test_position_helpers() {
    assert_eq!(Position::new(-5, 7).clamped(), Position::new(0, 7));
    assert_eq!(Position::new(1, 2).offset(50, 50), Position::new(51, 52));
    assert_eq!(Position::new(3, 4).to_string(), "(3, 4)");
}

#[test]
fn test_bounds_dimensions() {
    let bounds = Bounds {
        min_x: 10,
        min_y: 20,
        max_x: 210,
        max_y: 170,
    };
    assert_eq!(bounds.width(), 200);
    assert_eq!(bounds.height(), 150);
}

#[test]
fn test_ids_display_and_compare() {
    let id = NodeId::new("node_3");
    assert_eq!(id.to_string(), "node_3");
    assert_eq!(id, NodeId::from("node_3"));
    assert_eq!(NodeId::PREFIX, "node_");
    assert_eq!(ConnectionId::PREFIX, "conn_");
}

#[test]
fn test_catalog_builtin_order() {
    let catalog = NodeCatalog::default();
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(
        names,
        vec![
            "message",
            "question",
            "condition",
            "quickreply",
            "delay",
            "setvariable",
            "handover"
        ]
    );
    let condition = catalog.get("condition").unwrap();
    assert_eq!(condition.outputs(), vec!["true", "false"]);
    assert_eq!(condition.category(), "logic");
}

#[test]
fn test_every_kind_has_title_field_and_valid_defaults() {
    let catalog = NodeCatalog::default();
    for (name, kind) in catalog.kinds() {
        assert_eq!(kind.fields()[0].name, "title", "{}", name);
        let node = Node::new("node_1", name, Position::new(0, 0), kind.default_data());
        let report = catalog.validate(&node);
        assert!(report.is_valid(), "{}: {}", name, report);
    }
}

#[test]
fn test_catalog_search_is_case_insensitive() {
    let catalog = NodeCatalog::default();
    assert_eq!(catalog.search("HUMAN"), vec!["handover"]);
    assert_eq!(catalog.search("branch"), vec!["condition"]);
    assert!(catalog.search("spaceship").is_empty());
}

#[test]
fn test_catalog_alias_and_custom_type() {
    let webhook = CustomKind::new("webhook", "Webhook")
        .category("integration")
        .description("Call an external URL")
        .ports(&["default"], &["success", "failure"])
        .field(FieldSpec::text("url", "URL").required(), "https://example.com");
    let catalog = NodeCatalog::builder()
        .with_alias("text", "message")
        .with_alias("broken", "not_a_builtin")
        .with_custom_type(webhook)
        .build();

    assert!(catalog.contains("text"));
    assert!(!catalog.contains("broken"));
    assert_eq!(catalog.get("text").unwrap().label(), "Text Message");

    let kind = catalog.get("webhook").unwrap();
    assert_eq!(kind.outputs(), vec!["success", "failure"]);
    assert_eq!(
        kind.default_data().get("url"),
        Some(&FieldValue::from("https://example.com"))
    );
    assert_eq!(catalog.search("external"), vec!["webhook"]);

    let mut session = EditorSession::new(catalog, EditorConfig::default());
    let node = session.create_node("text", Position::new(0, 0)).unwrap();
    assert_eq!(node.kind(), "text");
    assert!(node.field("content").is_some());
}

#[test]
fn test_validation_errors_and_warnings() {
    let catalog = NodeCatalog::default();
    let mut data = catalog.get("quickreply").unwrap().default_data();
    data.insert("title".into(), "x".repeat(90).into());
    data.insert("variable".into(), "2fast".into());
    data.insert(
        "options".into(),
        FieldValue::List((0..12).map(|i| i.to_string()).collect()),
    );
    let node = Node::new("node_1", "quickreply", Position::new(0, 0), data);

    let report = catalog.validate(&node);
    assert_eq!(report.errors, vec!["variable format is invalid"]);
    assert_eq!(
        report.warnings,
        vec![
            "title is longer than recommended 80 characters",
            "options has more than recommended 10 items"
        ]
    );
    assert!(report.to_string().starts_with("error: variable"));
}

#[test]
fn test_validation_of_numbers_and_minimums() {
    let catalog = NodeCatalog::default();
    let mut data = catalog.get("delay").unwrap().default_data();
    data.insert("duration".into(), 50i64.into());
    let node = Node::new("node_1", "delay", Position::new(0, 0), data);
    assert_eq!(
        catalog.validate(&node).errors,
        vec!["duration must be at least 100"]
    );

    let mut data = catalog.get("quickreply").unwrap().default_data();
    data.insert("options".into(), FieldValue::List(Vec::new()));
    let node = Node::new("node_2", "quickreply", Position::new(0, 0), data);
    assert_eq!(catalog.validate(&node).errors, vec!["options is required"]);
}

#[test]
fn test_validation_of_unknown_kind() {
    let catalog = NodeCatalog::default();
    let node = Node::new("node_1", "mystery", Position::new(0, 0), NodeData::new());
    assert!(!catalog.validate(&node).is_valid());
}

#[test]
fn test_field_spec_builders() {
    let spec = FieldSpec::lines("options", "Options")
        .required()
        .items(Some(1), Some(5));
    assert_eq!(spec.widget, Widget::Lines);
    assert_eq!(
        spec.rules,
        FieldRules {
            required: true,
            min_items: Some(1),
            max_items: Some(5),
            ..FieldRules::default()
        }
    );
}

#[test]
fn test_error_display() {
    let err = EditorError::NodeNotFound(NodeId::new("node_8"));
    assert!(err.to_string().contains("node_8"));

    let err = EditorError::ConnectionRejected {
        from: NodeId::new("node_1"),
        to: NodeId::new("node_2"),
        from_port: "default".to_string(),
        to_port: "default".to_string(),
        reason: "an identical connection already exists".to_string(),
    };
    assert!(err.to_string().contains("node_1"));
    assert!(err.to_string().contains("identical"));

    let err: EditorError = ConversionError::DanglingLink("b".to_string()).into();
    assert!(err.to_string().contains("'b'"));
}
