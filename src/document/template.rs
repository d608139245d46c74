use super::{BotSettings, FlowDocument, IntoFlowDocument};
use crate::catalog::NodeCatalog;
use crate::error::{ConversionError, DocumentError};
use crate::graph::{Connection, ConnectionId, FieldValue, Node, NodeData, NodeId, Position};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A node in a template, addressed by a template-local key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    /// Fields that replace the type's defaults.
    #[serde(default)]
    pub overrides: NodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLink {
    pub from: String,
    pub to: String,
    #[serde(default = "default_port")]
    pub from_port: String,
    #[serde(default = "default_port")]
    pub to_port: String,
}

fn default_port() -> String {
    "default".to_string()
}

/// A premade starter flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub settings: BotSettings,
    pub nodes: Vec<TemplateNode>,
    #[serde(default)]
    pub links: Vec<TemplateLink>,
}

impl IntoFlowDocument for Template {
    fn into_document(self, catalog: &NodeCatalog) -> Result<FlowDocument, ConversionError> {
        let mut ids: AHashMap<String, NodeId> = AHashMap::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());

        for (index, template_node) in self.nodes.into_iter().enumerate() {
            let kind = catalog.get(&template_node.kind).ok_or_else(|| {
                ConversionError::UnknownType {
                    node: template_node.key.clone(),
                    kind: template_node.kind.clone(),
                }
            })?;
            let id = NodeId::from_counter(index as u64 + 1);
            if ids.insert(template_node.key.clone(), id.clone()).is_some() {
                return Err(ConversionError::DuplicateNode(template_node.key));
            }

            let mut data = kind.default_data();
            data.extend(template_node.overrides);
            nodes.push(Node::new(id, template_node.kind, template_node.position, data));
        }

        let resolve = |key: &str| {
            ids.get(key)
                .cloned()
                .ok_or_else(|| ConversionError::DanglingLink(key.to_string()))
        };
        let connections = self
            .links
            .into_iter()
            .enumerate()
            .map(|(index, link)| {
                Ok(Connection {
                    id: ConnectionId::from_counter(index as u64 + 1),
                    from: resolve(&link.from)?,
                    to: resolve(&link.to)?,
                    from_port: link.from_port,
                    to_port: link.to_port,
                })
            })
            .collect::<Result<Vec<_>, ConversionError>>()?;

        let mut document = FlowDocument::new(self.name);
        document.nodes = nodes;
        document.connections = connections;
        document.settings = self.settings;
        Ok(document)
    }
}

/// A named collection of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter templates shipped with the editor.
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                customer_service(),
                lead_generation(),
                sales(),
                technical_support(),
            ],
        }
    }

    /// Parses a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(Self {
            templates: serde_json::from_str(json)?,
        })
    }

    /// Adds a template, replacing any template with the same id.
    pub fn insert(&mut self, template: Template) {
        self.templates.retain(|t| t.id != template.id);
        self.templates.push(template);
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn node(key: &str, kind: &str, x: i32, y: i32, overrides: Vec<(&str, FieldValue)>) -> TemplateNode {
    TemplateNode {
        key: key.to_string(),
        kind: kind.to_string(),
        position: Position::new(x, y),
        overrides: overrides
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

fn link(from: &str, to: &str, from_port: &str) -> TemplateLink {
    TemplateLink {
        from: from.to_string(),
        to: to.to_string(),
        from_port: from_port.to_string(),
        to_port: default_port(),
    }
}

fn settings(welcome: &str, fallback: &str) -> BotSettings {
    BotSettings {
        welcome_message: welcome.to_string(),
        fallback_message: fallback.to_string(),
        ..BotSettings::default()
    }
}

fn customer_service() -> Template {
    Template {
        id: "customer-service".to_string(),
        name: "Customer Service Bot".to_string(),
        description: "Handle customer inquiries and support requests".to_string(),
        category: "support".to_string(),
        settings: settings(
            "Hello! I'm here to help with your questions. How can I assist you today?",
            "I'm not sure about that. Let me connect you with a human agent.",
        ),
        nodes: vec![
            node("start", "message", 100, 100, vec![
                ("title", "Greeting".into()),
                ("content", "How can I help you today?".into()),
            ]),
            node("menu", "question", 400, 100, vec![
                ("title", "Main Menu".into()),
                ("content", "Please select an option:".into()),
                ("options", vec!["Track Order", "Return Item", "Contact Support"].into()),
            ]),
            node("order", "message", 700, 0, vec![
                ("title", "Order Status".into()),
                ("content", "To check your order status, please provide your order number.".into()),
            ]),
            node("return", "message", 700, 200, vec![
                ("title", "Returns".into()),
                ("content", "I can help you with returns. What item would you like to return?".into()),
            ]),
            node("support", "handover", 700, 400, vec![("title", "Contact Support".into())]),
        ],
        links: vec![
            link("start", "menu", "default"),
            link("menu", "order", "option"),
            link("menu", "return", "option"),
            link("menu", "support", "option"),
        ],
    }
}

fn lead_generation() -> Template {
    Template {
        id: "lead-generation".to_string(),
        name: "Lead Generation Bot".to_string(),
        description: "Capture and qualify potential customers".to_string(),
        category: "marketing".to_string(),
        settings: settings(
            "Hi there! I'd love to learn more about your needs. What brings you here today?",
            "That's interesting! Can you tell me more about your specific requirements?",
        ),
        nodes: vec![
            node("start", "message", 100, 100, vec![
                ("title", "Greeting".into()),
                ("content", "What brings you here today?".into()),
            ]),
            node("qualify", "quickreply", 400, 100, vec![
                ("title", "Qualify".into()),
                ("content", "Tell me about your needs".into()),
                ("options", vec!["Get Quote", "Schedule Demo", "Download Guide"].into()),
                ("variable", "lead_interest".into()),
            ]),
            node("save", "setvariable", 700, 100, vec![
                ("title", "Mark Lead".into()),
                ("variable", "is_lead".into()),
                ("value", "true".into()),
                ("value_type", "boolean".into()),
            ]),
            node("followup", "message", 1000, 100, vec![
                ("title", "Follow Up".into()),
                ("content", "Thanks for your time! We'll be in touch soon.".into()),
            ]),
        ],
        links: vec![
            link("start", "qualify", "default"),
            link("qualify", "save", "default"),
            link("save", "followup", "default"),
        ],
    }
}

fn sales() -> Template {
    Template {
        id: "sales".to_string(),
        name: "Sales Assistant Bot".to_string(),
        description: "Help customers with product information and purchases".to_string(),
        category: "sales".to_string(),
        settings: settings(
            "Welcome! I'm here to help you find the perfect product. What are you looking for?",
            "I can help you find products or answer questions. What do you need?",
        ),
        nodes: vec![
            node("start", "message", 100, 100, vec![
                ("title", "Greeting".into()),
                ("content", "What are you looking for?".into()),
            ]),
            node("products", "question", 400, 100, vec![
                ("title", "Categories".into()),
                ("content", "Browse our categories:".into()),
                ("options", vec!["Electronics", "Clothing", "Home & Garden"].into()),
            ]),
            node("details", "message", 700, 100, vec![
                ("title", "Product Details".into()),
                ("content", "Here are some products you might like.".into()),
            ]),
        ],
        links: vec![
            link("start", "products", "default"),
            link("products", "details", "option"),
        ],
    }
}

fn technical_support() -> Template {
    Template {
        id: "support".to_string(),
        name: "Technical Support Bot".to_string(),
        description: "Provide technical assistance and troubleshooting".to_string(),
        category: "support".to_string(),
        settings: settings(
            "Hi! I'm here to help with technical issues. What problem are you experiencing?",
            "Let me help you troubleshoot this. Can you provide more details?",
        ),
        nodes: vec![
            node("start", "message", 100, 100, vec![
                ("title", "Greeting".into()),
                ("content", "What problem are you experiencing?".into()),
            ]),
            node("issue", "quickreply", 400, 100, vec![
                ("title", "Issue Type".into()),
                ("content", "Pick the closest match:".into()),
                ("options", vec!["Login Issues", "Bug Report", "Feature Request", "Live Chat"].into()),
                ("variable", "issue_type".into()),
            ]),
            node("route", "condition", 700, 100, vec![
                ("title", "Wants a Human?".into()),
                ("variable", "issue_type".into()),
                ("value", "Live Chat".into()),
            ]),
            node("agent", "handover", 1000, 0, vec![
                ("title", "Escalate".into()),
                ("department", "technical".into()),
                ("message", "I'll connect you with a technical specialist who can help further.".into()),
            ]),
            node("troubleshoot", "message", 1000, 200, vec![
                ("title", "Troubleshoot".into()),
                ("content", "Let's work through this step by step.".into()),
            ]),
        ],
        links: vec![
            link("start", "issue", "default"),
            link("issue", "route", "default"),
            link("route", "agent", "true"),
            link("route", "troubleshoot", "false"),
        ],
    }
}
