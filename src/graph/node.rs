use super::{Bounds, FieldValue, NodeId, Position, Rect, Size};
use crate::catalog::NodeCatalog;
use crate::error::EditorError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A node's type-specific payload, keyed by field name.
pub type NodeData = BTreeMap<String, FieldValue>;

/// A single conversation-flow step.
///
/// `id` and `kind` are fixed once the node exists; only `position` and `data` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    #[serde(rename = "type")]
    kind: String,
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        kind: impl Into<String>,
        position: Position,
        data: NodeData,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position,
            data,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.data.get(name)
    }

    /// The display title, falling back to the node id.
    pub fn title(&self) -> &str {
        self.data
            .get("title")
            .and_then(FieldValue::as_text)
            .unwrap_or(self.id.as_str())
    }
}

/// Holds the nodes of one editing session in insertion order.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: AHashMap<NodeId, Node>,
    order: Vec<NodeId>,
    next_id: u64,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node of `kind` with the kind's default payload.
    pub fn create(
        &mut self,
        catalog: &NodeCatalog,
        kind: &str,
        position: Position,
    ) -> Result<Node, EditorError> {
        let spec = catalog
            .get(kind)
            .ok_or_else(|| EditorError::UnknownType(kind.to_string()))?;
        let data = spec.default_data();
        self.insert(kind, position, data)
    }

    /// Creates a node of `kind` carrying `data` instead of the defaults.
    pub fn create_with_data(
        &mut self,
        catalog: &NodeCatalog,
        kind: &str,
        position: Position,
        data: NodeData,
    ) -> Result<Node, EditorError> {
        if !catalog.contains(kind) {
            return Err(EditorError::UnknownType(kind.to_string()));
        }
        self.insert(kind, position, data)
    }

    fn insert(
        &mut self,
        kind: &str,
        position: Position,
        data: NodeData,
    ) -> Result<Node, EditorError> {
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(EditorError::IdsExhausted(NodeId::PREFIX))?;
        let node = Node::new(NodeId::from_counter(self.next_id), kind, position, data);
        debug!(node = %node.id, kind, %position, "node created");
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node.clone());
        Ok(node)
    }

    /// Merges a single field into the node's payload and returns the previous value.
    pub fn update_field(
        &mut self,
        id: &NodeId,
        field: &str,
        value: FieldValue,
    ) -> Result<Option<FieldValue>, EditorError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        Ok(node.data.insert(field.to_string(), value))
    }

    /// Moves a node and returns its previous position.
    pub fn set_position(
        &mut self,
        id: &NodeId,
        position: Position,
    ) -> Result<Position, EditorError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        Ok(std::mem::replace(&mut node.position, position))
    }

    /// Removes a node. Unknown ids are ignored.
    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(node)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn find_by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.list().filter(move |node| node.kind == kind)
    }

    /// Nodes whose box of `size` lies entirely inside `region`.
    pub fn nodes_in_region(&self, region: Rect, size: Size) -> Vec<&Node> {
        self.list()
            .filter(|node| region.contains_box(node.position, size))
            .collect()
    }

    /// The extent covered by all nodes, or an all-zero `Bounds` when empty.
    pub fn bounds(&self, size: Size) -> Bounds {
        let mut iter = self.list();
        let Some(first) = iter.next() else {
            return Bounds::default();
        };
        let seed = Bounds {
            min_x: first.position.x,
            min_y: first.position.y,
            max_x: first.position.x + size.width,
            max_y: first.position.y + size.height,
        };
        iter.fold(seed, |acc, node| Bounds {
            min_x: acc.min_x.min(node.position.x),
            min_y: acc.min_y.min(node.position.y),
            max_x: acc.max_x.max(node.position.x + size.width),
            max_y: acc.max_y.max(node.position.y + size.height),
        })
    }

    /// A deep copy of all nodes in insertion order.
    pub fn to_vec(&self) -> Vec<Node> {
        self.list().cloned().collect()
    }

    /// Replaces every node. The id counter only ever moves forward so restored
    /// or imported ids are never handed out again.
    pub(crate) fn restore(&mut self, nodes: Vec<Node>) {
        self.nodes.clear();
        self.order.clear();
        for node in nodes {
            if let Some(n) = node.id.sequence() {
                self.next_id = self.next_id.max(n);
            }
            self.order.push(node.id.clone());
            self.nodes.insert(node.id.clone(), node);
        }
    }
}
