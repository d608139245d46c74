use crate::graph::Node;
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

mod fields;
mod kinds;
mod validation;

pub use fields::{FieldRules, FieldSpec, Widget};
pub use kinds::{CustomKind, NodeKind};
pub use validation::ValidationReport;

use kinds::{builtin_kind_by_name, register_builtin_kinds};

/// The set of node types a session may create, keyed by type name.
///
/// Cloning is cheap; kinds are shared.
#[derive(Clone)]
pub struct NodeCatalog {
    kinds: AHashMap<String, Arc<dyn NodeKind>>,
    order: Vec<String>,
}

pub struct NodeCatalogBuilder {
    kinds: AHashMap<String, Arc<dyn NodeKind>>,
    order: Vec<String>,
}

impl NodeCatalogBuilder {
    pub fn new() -> Self {
        let mut kinds: AHashMap<String, Arc<dyn NodeKind>> = AHashMap::new();
        let order = register_builtin_kinds(&mut kinds);
        Self { kinds, order }
    }

    /// Makes `user_type_name` create nodes that behave like the built-in `builtin_type_name`.
    pub fn with_alias(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        match builtin_kind_by_name(builtin_type_name) {
            Some(kind) => self.insert(user_type_name, kind),
            None => warn!(
                alias = user_type_name,
                builtin = builtin_type_name,
                "alias target is not a built-in node type; ignored"
            ),
        }
        self
    }

    pub fn with_custom_type(mut self, kind: impl NodeKind + 'static) -> Self {
        let name = kind.name().to_string();
        self.insert(&name, Arc::new(kind));
        self
    }

    fn insert(&mut self, name: &str, kind: Arc<dyn NodeKind>) {
        if self.kinds.insert(name.to_string(), kind).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn build(self) -> NodeCatalog {
        NodeCatalog {
            kinds: self.kinds,
            order: self.order,
        }
    }
}

impl Default for NodeCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeCatalog {
    pub fn builder() -> NodeCatalogBuilder {
        NodeCatalogBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&dyn NodeKind> {
        self.kinds.get(name).map(|kind| kind.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered type names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn kinds(&self) -> impl Iterator<Item = (&str, &dyn NodeKind)> {
        self.order
            .iter()
            .filter_map(|name| self.kinds.get(name).map(|k| (name.as_str(), k.as_ref())))
    }

    /// Type names whose name, label or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.kinds()
            .filter(|(name, kind)| {
                name.to_lowercase().contains(&query)
                    || kind.label().to_lowercase().contains(&query)
                    || kind.description().to_lowercase().contains(&query)
            })
            .map(|(name, _)| name)
            .collect()
    }

    /// Checks a node's payload against its kind's field rules.
    ///
    /// This never blocks an edit; it only reports.
    pub fn validate(&self, node: &Node) -> ValidationReport {
        let mut report = ValidationReport::default();
        let Some(kind) = self.get(node.kind()) else {
            report
                .errors
                .push(format!("unknown node type '{}'", node.kind()));
            return report;
        };
        for spec in kind.fields() {
            validation::check_field(&spec, node.field(&spec.name), &mut report);
        }
        report
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for NodeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCatalog")
            .field("kinds", &self.order)
            .finish()
    }
}
