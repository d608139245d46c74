use crate::graph::{NodeId, NodeRegistry};

/// Coarse selection state, driven only by explicit calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    One,
    Many,
}

/// Tracks which nodes are highlighted and which one feeds the property editor.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<NodeId>,
    target: Option<NodeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id`, clearing the previous selection first when `exclusive`.
    ///
    /// An id that is not in `nodes` clears the whole selection.
    pub fn select(&mut self, nodes: &NodeRegistry, id: &NodeId, exclusive: bool) {
        if !nodes.contains(id) {
            self.clear();
            return;
        }
        if exclusive {
            self.selected.clear();
        }
        if !self.selected.contains(id) {
            self.selected.push(id.clone());
        }
        self.target = Some(id.clone());
    }

    /// Adds `id` if absent, removes it if present. Used for modifier clicks.
    pub fn toggle(&mut self, nodes: &NodeRegistry, id: &NodeId) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            if self.target.as_ref() == Some(id) {
                self.target = self.selected.last().cloned();
            }
        } else {
            self.select(nodes, id, false);
        }
    }

    pub fn select_all(&mut self, nodes: &NodeRegistry) {
        self.selected = nodes.ids().cloned().collect();
        self.target = self.selected.last().cloned();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.target = None;
    }

    /// Drops `id` from the selection, e.g. after the node was deleted.
    pub fn forget(&mut self, id: &NodeId) {
        self.selected.retain(|s| s != id);
        if self.target.as_ref() == Some(id) {
            self.target = None;
        }
    }

    /// Selected ids in the order they were selected.
    pub fn current(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    /// The node shown in the property editor.
    pub fn target(&self) -> Option<&NodeId> {
        self.target.as_ref()
    }

    pub fn state(&self) -> SelectionState {
        match self.selected.len() {
            0 => SelectionState::Empty,
            1 => SelectionState::One,
            _ => SelectionState::Many,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
