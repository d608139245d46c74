use super::{ConnectionId, NodeId, NodeRegistry};
use crate::error::EditorError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A directed edge from an output port of one node to an input port of another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(alias = "from_port")]
    pub from_port: String,
    #[serde(alias = "to_port")]
    pub to_port: String,
}

impl Connection {
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.from == node || &self.to == node
    }

    /// Same endpoints and ports, ignoring the id.
    pub fn is_parallel_to(&self, other: &Connection) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.from_port == other.from_port
            && self.to_port == other.to_port
    }
}

/// Which connect requests the registry accepts.
///
/// The permissive default allows any number of identical edges and edges from a
/// node back to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionPolicy {
    pub allow_parallel: bool,
    pub allow_self_loops: bool,
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            allow_parallel: true,
            allow_self_loops: true,
        }
    }
}

/// Holds the connections of one editing session in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: AHashMap<ConnectionId, Connection>,
    order: Vec<ConnectionId>,
    next_id: u64,
    policy: ConnectionPolicy,
}

impl ConnectionRegistry {
    pub fn new(policy: ConnectionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    /// Connects two existing nodes. Both endpoints must be present in `nodes`.
    pub fn connect(
        &mut self,
        nodes: &NodeRegistry,
        from: &NodeId,
        to: &NodeId,
        from_port: &str,
        to_port: &str,
    ) -> Result<Connection, EditorError> {
        for endpoint in [from, to] {
            if !nodes.contains(endpoint) {
                return Err(EditorError::NodeNotFound(endpoint.clone()));
            }
        }

        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or(EditorError::IdsExhausted(ConnectionId::PREFIX))?;
        let candidate = Connection {
            id: ConnectionId::from_counter(next_id),
            from: from.clone(),
            to: to.clone(),
            from_port: from_port.to_string(),
            to_port: to_port.to_string(),
        };
        if let Some(reason) = self.rejection_reason(&candidate) {
            warn!(%from, %to, from_port, to_port, reason, "connection rejected");
            return Err(EditorError::ConnectionRejected {
                from: from.clone(),
                to: to.clone(),
                from_port: from_port.to_string(),
                to_port: to_port.to_string(),
                reason: reason.to_string(),
            });
        }

        self.next_id = next_id;
        debug!(connection = %candidate.id, %from, %to, "connection created");
        self.order.push(candidate.id.clone());
        self.connections
            .insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    fn rejection_reason(&self, candidate: &Connection) -> Option<&'static str> {
        if !self.policy.allow_self_loops && candidate.from == candidate.to {
            return Some("self connections are not allowed");
        }
        if !self.policy.allow_parallel && self.list().any(|c| c.is_parallel_to(candidate)) {
            return Some("an identical connection already exists");
        }
        None
    }

    /// Removes a connection. Unknown ids are ignored.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(connection)
    }

    /// Removes every connection touching `node`, returning them in insertion order.
    pub fn remove_touching(&mut self, node: &NodeId) -> Vec<Connection> {
        let doomed: Vec<ConnectionId> = self
            .list()
            .filter(|c| c.touches(node))
            .map(|c| c.id.clone())
            .collect();
        doomed
            .iter()
            .filter_map(|id| self.disconnect(id))
            .collect()
    }

    /// All connections where `node` is the source or the target.
    pub fn connections_of(&self, node: &NodeId) -> Vec<&Connection> {
        self.list().filter(|c| c.touches(node)).collect()
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Connection> {
        self.order.iter().filter_map(|id| self.connections.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Connection> {
        self.list().cloned().collect()
    }

    pub(crate) fn restore(&mut self, connections: Vec<Connection>) {
        self.connections.clear();
        self.order.clear();
        for connection in connections {
            if let Some(n) = connection.id.sequence() {
                self.next_id = self.next_id.max(n);
            }
            self.order.push(connection.id.clone());
            self.connections.insert(connection.id.clone(), connection);
        }
    }
}
