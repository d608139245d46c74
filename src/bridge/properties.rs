use crate::catalog::{FieldSpec, Widget};
use crate::editor::EditorSession;
use crate::error::EditorError;
use crate::graph::{FieldValue, NodeId};

/// One row of the property form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub widget: Widget,
    pub required: bool,
    /// Current value as editable text. Lists are one entry per line.
    pub value: String,
}

/// The property form for the node currently targeted by the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub node_id: NodeId,
    pub kind: String,
    pub label: String,
    pub fields: Vec<FormField>,
}

impl PropertyForm {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Maps the selected node's payload to form fields and raw input back to payload values.
pub struct PropertyEditor;

impl PropertyEditor {
    /// Builds the form for the selection target, or `None` when nothing is targeted.
    pub fn render(session: &EditorSession) -> Option<PropertyForm> {
        let node = session.node(session.selection().target()?)?;
        let kind = session.catalog().get(node.kind())?;
        let fields = kind
            .fields()
            .into_iter()
            .map(|spec| FormField {
                value: node
                    .field(&spec.name)
                    .map(FieldValue::to_input_text)
                    .unwrap_or_default(),
                required: spec.rules.required,
                name: spec.name,
                label: spec.label,
                widget: spec.widget,
            })
            .collect();
        Some(PropertyForm {
            node_id: node.id().clone(),
            kind: node.kind().to_string(),
            label: kind.label().to_string(),
            fields,
        })
    }

    /// Parses `raw` for `field` of the selection target and stores it.
    pub fn apply(session: &mut EditorSession, field: &str, raw: &str) -> Result<(), EditorError> {
        let id = session
            .selection()
            .target()
            .cloned()
            .ok_or(EditorError::NoTarget)?;
        let node = session
            .node(&id)
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        let spec = session
            .catalog()
            .get(node.kind())
            .and_then(|kind| kind.fields().into_iter().find(|spec| spec.name == field))
            .ok_or_else(|| EditorError::UnknownField {
                kind: node.kind().to_string(),
                field: field.to_string(),
            })?;
        let value = Self::parse(&spec, raw)?;
        session.update_field(&id, field, value)
    }

    /// Converts raw form input according to the field's widget.
    pub fn parse(spec: &FieldSpec, raw: &str) -> Result<FieldValue, EditorError> {
        let invalid = |message: String| EditorError::InvalidInput {
            field: spec.name.clone(),
            message,
        };
        match &spec.widget {
            Widget::Text | Widget::TextArea => Ok(FieldValue::Text(raw.to_string())),
            Widget::Lines => Ok(FieldValue::List(
                raw.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            Widget::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(FieldValue::Null);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(FieldValue::Number)
                    .ok_or_else(|| invalid(format!("'{trimmed}' is not a number")))
            }
            Widget::Toggle => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "off" | "no" | "0" | "" => Ok(FieldValue::Bool(false)),
                other => Err(invalid(format!("'{other}' is not a boolean"))),
            },
            Widget::Select(choices) => {
                if choices.iter().any(|choice| choice == raw) {
                    Ok(FieldValue::Text(raw.to_string()))
                } else {
                    Err(invalid(format!(
                        "'{raw}' is not one of: {}",
                        choices.join(", ")
                    )))
                }
            }
        }
    }
}
