use super::{EditorEvent, EventSink};
use crate::catalog::{NodeCatalog, ValidationReport};
use crate::config::EditorConfig;
use crate::document::{BotSettings, FlowDocument, IntoFlowDocument, Template};
use crate::error::EditorError;
use crate::graph::{
    Bounds, Connection, ConnectionId, ConnectionRegistry, FieldValue, Node, NodeData, NodeId,
    NodeRegistry, Position, Rect,
};
use crate::history::{HistoryStack, Snapshot};
use crate::selection::SelectionManager;
use ahash::AHashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// A copied node, detached from any session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    pub kind: String,
    pub position: Position,
    pub data: NodeData,
}

/// One open flow and everything needed to edit it.
///
/// Every mutating operation that changes the graph records exactly one
/// history snapshot. Several sessions can live side by side; nothing is shared.
pub struct EditorSession {
    catalog: NodeCatalog,
    config: EditorConfig,
    nodes: NodeRegistry,
    connections: ConnectionRegistry,
    history: HistoryStack,
    selection: SelectionManager,
    clipboard: Vec<ClipboardEntry>,
    sinks: Vec<Box<dyn EventSink>>,
    name: String,
    settings: BotSettings,
}

impl EditorSession {
    /// Creates an empty session and records the empty state as the history baseline.
    pub fn new(catalog: NodeCatalog, config: EditorConfig) -> Self {
        let mut session = Self {
            nodes: NodeRegistry::new(),
            connections: ConnectionRegistry::new(config.connection_policy),
            history: HistoryStack::new(config.history_limit),
            selection: SelectionManager::new(),
            clipboard: Vec::new(),
            sinks: Vec::new(),
            name: "Untitled Bot".to_string(),
            settings: BotSettings::default(),
            catalog,
            config,
        };
        session.commit();
        session
    }

    /// Registers a subscriber for every event emitted from now on.
    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    // --- Nodes ---

    /// Creates a node with the kind's default payload and makes it the sole selection.
    pub fn create_node(&mut self, kind: &str, position: Position) -> Result<Node, EditorError> {
        let node = self.nodes.create(&self.catalog, kind, position)?;
        self.after_create(&[node.id().clone()]);
        Ok(node)
    }

    /// Sets one payload field. The value is stored as given.
    pub fn update_field(
        &mut self,
        id: &NodeId,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), EditorError> {
        self.nodes.update_field(id, field, value.into())?;
        self.commit();
        self.emit(EditorEvent::NodeUpdated {
            id: id.clone(),
            field: field.to_string(),
        });
        Ok(())
    }

    /// Deletes a node and every connection touching it. Unknown ids are a no-op.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.remove_node(id)?;
        self.commit();
        Some(node)
    }

    /// Deletes every selected node as a single undoable step.
    pub fn delete_selection(&mut self) -> Vec<Node> {
        let doomed = self.selection.current().to_vec();
        let removed: Vec<Node> = doomed.iter().filter_map(|id| self.remove_node(id)).collect();
        if !removed.is_empty() {
            self.commit();
        }
        removed
    }

    fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        for connection in self.connections.remove_touching(id) {
            self.emit(EditorEvent::ConnectionRemoved { id: connection.id });
        }
        self.selection.forget(id);
        self.emit(EditorEvent::NodeRemoved {
            id: id.clone(),
            kind: node.kind().to_string(),
        });
        Some(node)
    }

    /// Moves a node in one undoable step. Moving to the current position records nothing.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> Result<(), EditorError> {
        let from = self.nodes.set_position(id, position)?;
        self.commit_move(id, from)?;
        Ok(())
    }

    /// Repositions a node without touching history. Used while a drag is in flight.
    pub(crate) fn drag_to(&mut self, id: &NodeId, position: Position) -> Result<(), EditorError> {
        self.nodes.set_position(id, position)?;
        Ok(())
    }

    /// Records a finished move that started at `from`. Returns whether anything moved.
    pub(crate) fn commit_move(&mut self, id: &NodeId, from: Position) -> Result<bool, EditorError> {
        let to = self
            .nodes
            .get(id)
            .map(|node| node.position)
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        if to == from {
            return Ok(false);
        }
        self.commit();
        self.emit(EditorEvent::NodeMoved {
            id: id.clone(),
            from,
            to,
        });
        Ok(true)
    }

    /// Creates a copy of a node, offset from the original, and selects it.
    pub fn duplicate_node(&mut self, id: &NodeId) -> Result<Node, EditorError> {
        let source = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        let (dx, dy) = (self.config.duplicate_offset.x, self.config.duplicate_offset.y);
        let kind = source.kind().to_string();
        let node = self.nodes.create_with_data(
            &self.catalog,
            &kind,
            source.position.offset(dx, dy),
            source.data,
        )?;
        self.after_create(&[node.id().clone()]);
        Ok(node)
    }

    /// Copies the selected nodes to the session clipboard. Returns how many were copied.
    pub fn copy_selection(&mut self) -> usize {
        self.clipboard = self
            .selection
            .current()
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| ClipboardEntry {
                kind: node.kind().to_string(),
                position: node.position,
                data: node.data.clone(),
            })
            .collect();
        debug!(count = self.clipboard.len(), "selection copied");
        self.clipboard.len()
    }

    /// Recreates the clipboard contents, offset from where they were copied, and selects them.
    ///
    /// Pasting again cascades: each paste lands one offset further.
    pub fn paste(&mut self) -> Result<Vec<NodeId>, EditorError> {
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(entry) = self
            .clipboard
            .iter()
            .find(|entry| !self.catalog.contains(&entry.kind))
        {
            return Err(EditorError::UnknownType(entry.kind.clone()));
        }

        let (dx, dy) = (self.config.duplicate_offset.x, self.config.duplicate_offset.y);
        let before = self.nodes.clone();
        let mut pasted = Vec::with_capacity(self.clipboard.len());
        for entry in &self.clipboard {
            let created = self.nodes.create_with_data(
                &self.catalog,
                &entry.kind,
                entry.position.offset(dx, dy),
                entry.data.clone(),
            );
            match created {
                Ok(node) => pasted.push(node.id().clone()),
                Err(error) => {
                    self.nodes = before;
                    return Err(error);
                }
            }
        }
        for entry in &mut self.clipboard {
            entry.position = entry.position.offset(dx, dy);
        }
        self.after_create(&pasted);
        Ok(pasted)
    }

    pub fn clipboard(&self) -> &[ClipboardEntry] {
        &self.clipboard
    }

    fn after_create(&mut self, created: &[NodeId]) {
        self.selection.clear();
        for id in created {
            self.selection.select(&self.nodes, id, false);
        }
        self.commit();
        for id in created {
            if let Some(node) = self.nodes.get(id) {
                let kind = node.kind().to_string();
                self.emit(EditorEvent::NodeAdded {
                    id: id.clone(),
                    kind,
                });
            }
        }
        self.emit_selection();
    }

    // --- Connections ---

    pub fn connect(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        from_port: &str,
        to_port: &str,
    ) -> Result<Connection, EditorError> {
        let connection = self
            .connections
            .connect(&self.nodes, from, to, from_port, to_port)?;
        self.commit();
        self.emit(EditorEvent::ConnectionAdded {
            id: connection.id.clone(),
            from: from.clone(),
            to: to.clone(),
        });
        Ok(connection)
    }

    /// Removes a connection. Unknown ids are a no-op.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<Connection> {
        let connection = self.connections.disconnect(id)?;
        self.commit();
        self.emit(EditorEvent::ConnectionRemoved { id: id.clone() });
        Some(connection)
    }

    /// Connections with `node` at either end, in insertion order.
    pub fn connections_of(&self, node: &NodeId) -> Vec<&Connection> {
        self.connections.connections_of(node)
    }

    // --- Selection ---

    pub fn select(&mut self, id: &NodeId, exclusive: bool) {
        self.selection.select(&self.nodes, id, exclusive);
        self.emit_selection();
    }

    pub fn toggle_selection(&mut self, id: &NodeId) {
        self.selection.toggle(&self.nodes, id);
        self.emit_selection();
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.nodes);
        self.emit_selection();
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.emit(EditorEvent::SelectionCleared);
        }
    }

    fn emit_selection(&mut self) {
        let event = if self.selection.is_empty() {
            EditorEvent::SelectionCleared
        } else {
            EditorEvent::SelectionChanged {
                selected: self.selection.current().to_vec(),
            }
        };
        self.emit(event);
    }

    // --- History ---

    /// Steps back one history entry. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(state);
        self.emit(EditorEvent::Undone);
        true
    }

    /// Steps forward one history entry. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(state);
        self.emit(EditorEvent::Redone);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, state: Snapshot) {
        self.nodes.restore(state.nodes);
        self.connections.restore(state.connections);
        self.selection.clear();
    }

    fn commit(&mut self) {
        self.history.snapshot(Snapshot {
            nodes: self.nodes.to_vec(),
            connections: self.connections.to_vec(),
        });
    }

    fn emit(&mut self, event: EditorEvent) {
        debug!(event = event.name(), ?event, "editor event");
        for sink in &mut self.sinks {
            sink.emit(&event);
        }
    }

    // --- Persistence ---

    /// A deep, storage-ready copy of the current flow.
    pub fn export_state(&self) -> FlowDocument {
        let mut document = FlowDocument::new(self.name.clone());
        document.nodes = self.nodes.to_vec();
        document.connections = self.connections.to_vec();
        document.settings = self.settings.clone();
        info!(
            nodes = document.nodes.len(),
            connections = document.connections.len(),
            "flow exported"
        );
        document
    }

    /// Replaces the whole flow with `document` as one undoable step.
    ///
    /// The document is checked first; on any error the session is left untouched.
    pub fn import_state(&mut self, document: FlowDocument) -> Result<(), EditorError> {
        if let Err(error) = self.check_document(&document) {
            warn!(%error, "flow import rejected");
            return Err(error);
        }

        let (node_count, connection_count) = (document.nodes.len(), document.connections.len());
        self.nodes.restore(document.nodes);
        self.connections.restore(document.connections);
        self.selection.clear();
        self.name = document.name;
        self.settings = document.settings;
        self.commit();
        info!(
            name = %self.name,
            nodes = node_count,
            connections = connection_count,
            "flow imported"
        );
        self.emit(EditorEvent::StateImported {
            nodes: node_count,
            connections: connection_count,
        });
        Ok(())
    }

    /// Converts a caller-defined format and imports the result.
    pub fn import_from(&mut self, source: impl IntoFlowDocument) -> Result<(), EditorError> {
        let document = source.into_document(&self.catalog)?;
        self.import_state(document)
    }

    /// Replaces the flow with a template's nodes and links.
    pub fn load_template(&mut self, template: &Template) -> Result<(), EditorError> {
        info!(template = %template.id, "loading template");
        self.import_from(template.clone())
    }

    fn check_document(&self, document: &FlowDocument) -> Result<(), EditorError> {
        let mut node_ids = AHashSet::with_capacity(document.nodes.len());
        for node in &document.nodes {
            if !self.catalog.contains(node.kind()) {
                return Err(EditorError::UnknownType(node.kind().to_string()));
            }
            if node.id().is_last_in_sequence() {
                return Err(EditorError::InvalidDocument(format!(
                    "node id '{}' leaves no room for new node ids",
                    node.id()
                )));
            }
            if !node_ids.insert(node.id()) {
                return Err(EditorError::InvalidDocument(format!(
                    "node id '{}' appears more than once",
                    node.id()
                )));
            }
        }

        let mut connection_ids = AHashSet::with_capacity(document.connections.len());
        for connection in &document.connections {
            if connection.id.is_last_in_sequence() {
                return Err(EditorError::InvalidDocument(format!(
                    "connection id '{}' leaves no room for new connection ids",
                    connection.id
                )));
            }
            if !connection_ids.insert(&connection.id) {
                return Err(EditorError::InvalidDocument(format!(
                    "connection id '{}' appears more than once",
                    connection.id
                )));
            }
            for endpoint in [&connection.from, &connection.to] {
                if !node_ids.contains(endpoint) {
                    return Err(EditorError::InvalidDocument(format!(
                        "connection '{}' references missing node '{}'",
                        connection.id, endpoint
                    )));
                }
            }
        }
        Ok(())
    }

    // --- Validation & queries ---

    pub fn validate_node(&self, id: &NodeId) -> Result<ValidationReport, EditorError> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.clone()))?;
        Ok(self.catalog.validate(node))
    }

    /// Reports for every node that has at least one error or warning.
    pub fn validate_all(&self) -> Vec<(NodeId, ValidationReport)> {
        self.nodes
            .list()
            .map(|node| (node.id().clone(), self.catalog.validate(node)))
            .filter(|(_, report)| !report.errors.is_empty() || !report.warnings.is_empty())
            .collect()
    }

    /// Nodes lying entirely inside `region`, using the configured node size.
    pub fn nodes_in_region(&self, region: Rect) -> Vec<&Node> {
        self.nodes.nodes_in_region(region, self.config.node_size)
    }

    pub fn bounds(&self) -> Bounds {
        self.nodes.bounds(self.config.node_size)
    }

    // --- Accessors ---

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: BotSettings) {
        self.settings = settings;
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(NodeCatalog::default(), EditorConfig::default())
    }
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("name", &self.name)
            .field("nodes", &self.nodes.len())
            .field("connections", &self.connections.len())
            .field("history", &self.history.len())
            .field("selected", &self.selection.current())
            .finish()
    }
}
