use super::fields::FieldSpec;
use crate::graph::{FieldValue, NodeData};
use ahash::AHashMap;
use std::sync::Arc;

/// Defines the contract for one node type that can be placed in a flow.
pub trait NodeKind: Send + Sync {
    /// The type name stored on nodes, e.g. `"message"`.
    fn name(&self) -> &str;
    /// Human-readable name shown in the component library.
    fn label(&self) -> &str;
    fn category(&self) -> &str;
    fn description(&self) -> &str;
    fn inputs(&self) -> Vec<String>;
    fn outputs(&self) -> Vec<String>;
    /// The fields shown in the property form, in display order.
    fn fields(&self) -> Vec<FieldSpec>;
    /// The payload a freshly created node starts with.
    fn default_data(&self) -> NodeData;
}

/// The field every node kind carries.
fn title_field() -> FieldSpec {
    FieldSpec::text("title", "Node Title").required().length(Some(1), Some(80))
}

fn data(entries: Vec<(&str, FieldValue)>) -> NodeData {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn message_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::text_area("content", "Message Content")
            .required()
            .length(Some(1), Some(1000)),
        FieldSpec::number("delay", "Delay (ms)").range(Some(0.0), Some(10_000.0)),
    ]
}

fn message_defaults() -> NodeData {
    data(vec![
        ("title", "Welcome Message".into()),
        (
            "content",
            "Hello! Welcome to our chatbot. How can I help you today?".into(),
        ),
        ("delay", 0i64.into()),
    ])
}

fn question_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::text_area("content", "Question Text")
            .required()
            .length(Some(1), Some(500)),
        FieldSpec::lines("options", "Answer Options (one per line)").items(None, Some(10)),
    ]
}

fn question_defaults() -> NodeData {
    data(vec![
        ("title", "User Question".into()),
        ("content", "What would you like to do?".into()),
        (
            "options",
            vec!["Get Support", "Learn More", "Contact Sales"].into(),
        ),
    ])
}

fn condition_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::text("variable", "Variable").required().identifier(),
        FieldSpec::select(
            "operator",
            "Operator",
            &[
                "equals",
                "not_equals",
                "contains",
                "greater_than",
                "less_than",
            ],
        ),
        FieldSpec::text("value", "Value").required(),
    ]
}

fn condition_defaults() -> NodeData {
    data(vec![
        ("title", "Condition Check".into()),
        ("variable", "user_response".into()),
        ("operator", "equals".into()),
        ("value", "yes".into()),
    ])
}

fn quickreply_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::text_area("content", "Prompt").required().length(Some(1), None),
        FieldSpec::lines("options", "Buttons (one per line)")
            .required()
            .items(Some(1), Some(10)),
        FieldSpec::text("variable", "Store Answer In").identifier(),
        FieldSpec::toggle("allow_multiple", "Allow Multiple"),
    ]
}

fn quickreply_defaults() -> NodeData {
    data(vec![
        ("title", "Quick Replies".into()),
        ("content", "Choose an option:".into()),
        ("options", vec!["Option 1", "Option 2", "Option 3"].into()),
        ("variable", "user_choice".into()),
        ("allow_multiple", false.into()),
    ])
}

fn delay_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::number("duration", "Duration (ms)")
            .required()
            .range(Some(100.0), Some(30_000.0)),
        FieldSpec::toggle("show_typing", "Show Typing Indicator"),
    ]
}

fn delay_defaults() -> NodeData {
    data(vec![
        ("title", "Delay".into()),
        ("duration", 2000i64.into()),
        ("show_typing", true.into()),
    ])
}

fn setvariable_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::text("variable", "Variable").required().identifier(),
        FieldSpec::text("value", "Value").required(),
        FieldSpec::select("value_type", "Type", &["string", "number", "boolean"]),
    ]
}

fn setvariable_defaults() -> NodeData {
    data(vec![
        ("title", "Set Variable".into()),
        ("variable", "variable_name".into()),
        ("value", "variable_value".into()),
        ("value_type", "string".into()),
    ])
}

fn handover_fields() -> Vec<FieldSpec> {
    vec![
        title_field(),
        FieldSpec::text("department", "Department").required(),
        FieldSpec::text_area("message", "Handover Message")
            .required()
            .length(Some(1), None),
        FieldSpec::select("priority", "Priority", &["low", "normal", "high"]),
    ]
}

fn handover_defaults() -> NodeData {
    data(vec![
        ("title", "Human Handover".into()),
        ("department", "support".into()),
        ("message", "Connecting you with an agent...".into()),
        ("priority", "normal".into()),
    ])
}

/// Defines the built-in node kinds, their registration, and their lookup by name.
macro_rules! define_node_kinds {
    ( $( ($struct_name:ident, $name:literal, $label:expr, $category:expr, $description:expr,
          [$($input:expr),*], [$($output:expr),*], $fields:path, $defaults:path) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl NodeKind for $struct_name {
                fn name(&self) -> &str { $name }
                fn label(&self) -> &str { $label }
                fn category(&self) -> &str { $category }
                fn description(&self) -> &str { $description }
                fn inputs(&self) -> Vec<String> { vec![$($input.to_string()),*] }
                fn outputs(&self) -> Vec<String> { vec![$($output.to_string()),*] }
                fn fields(&self) -> Vec<FieldSpec> { $fields() }
                fn default_data(&self) -> NodeData { $defaults() }
            }
        )*

        /// Registers every built-in kind, returning their names in catalog order.
        pub(super) fn register_builtin_kinds(
            registry: &mut AHashMap<String, Arc<dyn NodeKind>>,
        ) -> Vec<String> {
            let mut order = Vec::new();
            $(
                registry.insert($name.to_string(), Arc::new($struct_name));
                order.push($name.to_string());
            )*
            order
        }

        pub(super) fn builtin_kind_by_name(name: &str) -> Option<Arc<dyn NodeKind>> {
            match name {
                $( $name => Some(Arc::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

define_node_kinds! {
    (MessageKind, "message", "Text Message", "interaction",
        "Send a message to the user",
        ["default"], ["default"], message_fields, message_defaults),
    (QuestionKind, "question", "Question", "interaction",
        "Ask the user a question with suggested answers",
        ["default"], ["default", "option"], question_fields, question_defaults),
    (ConditionKind, "condition", "Condition", "logic",
        "Branch conversation flow based on conditions",
        ["default"], ["true", "false"], condition_fields, condition_defaults),
    (QuickReplyKind, "quickreply", "Quick Replies", "interaction",
        "Multiple choice buttons",
        ["default"], ["default", "option"], quickreply_fields, quickreply_defaults),
    (DelayKind, "delay", "Delay", "utility",
        "Add a delay before continuing",
        ["default"], ["default"], delay_fields, delay_defaults),
    (SetVariableKind, "setvariable", "Set Variable", "data",
        "Set or update a variable value",
        ["default"], ["default"], setvariable_fields, setvariable_defaults),
    (HandoverKind, "handover", "Human Handover", "action",
        "Transfer conversation to a human agent",
        ["default"], ["success", "unavailable"], handover_fields, handover_defaults),
}

/// A caller-defined node kind, for types the built-in catalog does not cover.
#[derive(Debug, Clone)]
pub struct CustomKind {
    name: String,
    label: String,
    category: String,
    description: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    fields: Vec<FieldSpec>,
    defaults: NodeData,
}

impl CustomKind {
    /// Starts a kind with one `default` input, one `default` output, and the common title field.
    pub fn new(name: &str, label: &str) -> Self {
        let mut defaults = NodeData::new();
        defaults.insert("title".to_string(), label.into());
        Self {
            name: name.to_string(),
            label: label.to_string(),
            category: "custom".to_string(),
            description: String::new(),
            inputs: vec!["default".to_string()],
            outputs: vec!["default".to_string()],
            fields: vec![title_field()],
            defaults,
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn ports(mut self, inputs: &[&str], outputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|p| p.to_string()).collect();
        self.outputs = outputs.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Adds an editable field together with its default value.
    pub fn field(mut self, spec: FieldSpec, default: impl Into<FieldValue>) -> Self {
        self.defaults.insert(spec.name.clone(), default.into());
        self.fields.push(spec);
        self
    }
}

impl NodeKind for CustomKind {
    fn name(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn inputs(&self) -> Vec<String> {
        self.inputs.clone()
    }
    fn outputs(&self) -> Vec<String> {
        self.outputs.clone()
    }
    fn fields(&self) -> Vec<FieldSpec> {
        self.fields.clone()
    }
    fn default_data(&self) -> NodeData {
        self.defaults.clone()
    }
}
