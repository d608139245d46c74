use super::{Key, Modifiers, Shortcut};
use crate::editor::EditorSession;
use crate::error::EditorError;
use crate::graph::{Bounds, Connection, ConnectionId, Node, NodeId, Position};
use serde::Serialize;
use tracing::debug;

/// Smallest zoom factor a surface may use.
pub const MIN_SCALE: f64 = 0.1;
/// Largest zoom factor a surface may use.
pub const MAX_SCALE: f64 = 3.0;

/// Where the surface sits on screen, how far it is scrolled and panned, and its zoom.
///
/// `offset` is the pan in screen pixels; `scale` multiplies surface units into screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Position,
    pub scroll: Position,
    pub offset: Position,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Position::default(),
            scroll: Position::default(),
            offset: Position::default(),
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// A viewport at `origin`, scrolled by `scroll`, with no pan or zoom.
    pub fn new(origin: Position, scroll: Position) -> Self {
        Self {
            origin,
            scroll,
            ..Self::default()
        }
    }

    /// Converts a screen pointer position to surface coordinates.
    pub fn to_surface(&self, pointer: Position) -> Position {
        let x = f64::from(pointer.x - self.origin.x + self.scroll.x - self.offset.x) / self.scale;
        let y = f64::from(pointer.y - self.origin.y + self.scroll.y - self.offset.y) / self.scale;
        Position::new(x.round() as i32, y.round() as i32)
    }

    /// Multiplies the zoom by `factor`, keeping the surface point under the
    /// screen position `center` fixed. The result is clamped to
    /// `MIN_SCALE..=MAX_SCALE`; returns whether the zoom changed.
    pub fn zoom_at(&mut self, factor: f64, center: Position) -> bool {
        let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if !scale.is_finite() || scale == self.scale {
            return false;
        }
        let change = scale / self.scale;
        let x = f64::from(center.x - self.origin.x);
        let y = f64::from(center.y - self.origin.y);
        self.offset = Position::new(
            (x - (x - f64::from(self.offset.x)) * change).round() as i32,
            (y - (y - f64::from(self.offset.y)) * change).round() as i32,
        );
        self.scale = scale;
        true
    }

    /// Pans by a screen-pixel delta.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.offset = self.offset.offset(dx, dy);
    }

    /// Back to no pan and a zoom of 1.
    pub fn reset_zoom(&mut self) {
        self.offset = Position::default();
        self.scale = 1.0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging {
        node: NodeId,
        start: Position,
        /// Pointer position relative to the node's corner when the drag began.
        grab: Position,
    },
    Connecting {
        from: NodeId,
        port: String,
    },
}

/// Rendered form of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: String,
    pub label: String,
    pub title: String,
    pub preview: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub position: Position,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    pub from_port: String,
    pub to_port: String,
}

/// Everything a surface needs to draw the current session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub bounds: Bounds,
}

/// Translates surface input into session operations and projects the session back.
#[derive(Debug, Clone, Default)]
pub struct RenderBridge {
    viewport: Viewport,
    gesture: Gesture,
}

impl RenderBridge {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            gesture: Gesture::Idle,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Mutable access for zooming and panning.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.gesture, Gesture::Connecting { .. })
    }

    // --- Drag ---

    /// Starts dragging `node` from the screen position `pointer`.
    pub fn pointer_down(
        &mut self,
        session: &EditorSession,
        node: &NodeId,
        pointer: Position,
    ) -> Result<(), EditorError> {
        let start = session
            .node(node)
            .map(|n| n.position)
            .ok_or_else(|| EditorError::NodeNotFound(node.clone()))?;
        let at = self.viewport.to_surface(pointer);
        self.gesture = Gesture::Dragging {
            node: node.clone(),
            start,
            grab: Position::new(at.x - start.x, at.y - start.y),
        };
        debug!(%node, %start, "drag started");
        Ok(())
    }

    /// Follows the pointer while dragging. Nothing is recorded in history.
    pub fn pointer_move(
        &mut self,
        session: &mut EditorSession,
        pointer: Position,
    ) -> Result<(), EditorError> {
        let Gesture::Dragging { node, grab, .. } = &self.gesture else {
            return Ok(());
        };
        let at = self.viewport.to_surface(pointer);
        let position = Position::new(at.x - grab.x, at.y - grab.y).clamped();
        session.drag_to(node, position)
    }

    /// Ends a drag. Over the surface the move is committed as one undoable step;
    /// anywhere else the node returns to where it started.
    ///
    /// Returns whether a move was committed.
    pub fn pointer_up(
        &mut self,
        session: &mut EditorSession,
        over_surface: bool,
    ) -> Result<bool, EditorError> {
        if !self.is_dragging() {
            return Ok(false);
        }
        let Gesture::Dragging { node, start, .. } = std::mem::take(&mut self.gesture) else {
            return Ok(false);
        };
        if over_surface {
            session.commit_move(&node, start)
        } else {
            debug!(%node, %start, "drag cancelled");
            session.drag_to(&node, start)?;
            Ok(false)
        }
    }

    // --- Create & select ---

    /// Creates a node of `kind` where a palette item was dropped.
    pub fn drop_component(
        &mut self,
        session: &mut EditorSession,
        kind: &str,
        pointer: Position,
    ) -> Result<Node, EditorError> {
        let position = self.viewport.to_surface(pointer);
        session.create_node(kind, position)
    }

    /// A click on a node, or on empty surface when `target` is `None`.
    pub fn click(
        &mut self,
        session: &mut EditorSession,
        target: Option<&NodeId>,
        modifiers: Modifiers,
    ) {
        match target {
            None => session.clear_selection(),
            Some(id) if modifiers.command() => session.toggle_selection(id),
            Some(id) => session.select(id, true),
        }
    }

    // --- Ports ---

    /// Starts a connection from an output port.
    pub fn begin_connection(
        &mut self,
        session: &EditorSession,
        from: &NodeId,
        port: &str,
    ) -> Result<(), EditorError> {
        if session.node(from).is_none() {
            return Err(EditorError::NodeNotFound(from.clone()));
        }
        self.gesture = Gesture::Connecting {
            from: from.clone(),
            port: port.to_string(),
        };
        Ok(())
    }

    /// Finishes a pending connection on an input port.
    ///
    /// Returns `None` when no connection was being drawn.
    pub fn complete_connection(
        &mut self,
        session: &mut EditorSession,
        to: &NodeId,
        port: &str,
    ) -> Result<Option<Connection>, EditorError> {
        if !self.is_connecting() {
            return Ok(None);
        }
        let Gesture::Connecting { from, port: from_port } = std::mem::take(&mut self.gesture)
        else {
            return Ok(None);
        };
        session.connect(&from, to, &from_port, port).map(Some)
    }

    pub fn cancel_connection(&mut self) {
        if self.is_connecting() {
            self.gesture = Gesture::Idle;
        }
    }

    /// Abandons whatever gesture is in progress. A drag reverts its node.
    pub fn cancel_gesture(&mut self, session: &mut EditorSession) -> Result<(), EditorError> {
        if let Gesture::Dragging { node, start, .. } = std::mem::take(&mut self.gesture) {
            session.drag_to(&node, start)?;
        }
        Ok(())
    }

    // --- Keyboard ---

    /// Runs the shortcut bound to a key press, if any, and reports which one ran.
    pub fn key_down(
        &mut self,
        session: &mut EditorSession,
        key: Key,
        modifiers: Modifiers,
    ) -> Result<Option<Shortcut>, EditorError> {
        let Some(shortcut) = Shortcut::from_key(key, modifiers) else {
            return Ok(None);
        };
        if self.is_dragging() && shortcut.edits_graph() {
            debug!(?shortcut, "shortcut ignored during drag");
            return Ok(None);
        }
        debug!(?shortcut, "shortcut");
        match shortcut {
            Shortcut::DeleteSelection => {
                session.delete_selection();
            }
            Shortcut::Cancel => {
                self.cancel_gesture(session)?;
                session.clear_selection();
            }
            Shortcut::Undo => {
                session.undo();
            }
            Shortcut::Redo => {
                session.redo();
            }
            Shortcut::SelectAll => session.select_all(),
            Shortcut::Copy => {
                session.copy_selection();
            }
            Shortcut::Paste => {
                session.paste()?;
            }
            Shortcut::Duplicate => {
                if let Some(target) = session.selection().target().cloned() {
                    session.duplicate_node(&target)?;
                }
            }
        }
        Ok(Some(shortcut))
    }

    // --- Projection ---

    /// Projects the session into view data, in node and connection insertion order.
    pub fn project(&self, session: &EditorSession) -> SurfaceView {
        let preview_length = session.config().preview_length;
        let nodes = session
            .nodes()
            .list()
            .map(|node| {
                let kind = session.catalog().get(node.kind());
                NodeView {
                    id: node.id().clone(),
                    kind: node.kind().to_string(),
                    label: kind.map_or_else(|| node.kind().to_string(), |k| k.label().to_string()),
                    title: node.title().to_string(),
                    preview: preview(node, preview_length),
                    inputs: kind.map(|k| k.inputs()).unwrap_or_default(),
                    outputs: kind.map(|k| k.outputs()).unwrap_or_default(),
                    position: node.position,
                    selected: session.selection().contains(node.id()),
                }
            })
            .collect();
        let edges = session
            .connections()
            .list()
            .map(|c| EdgeView {
                id: c.id.clone(),
                from: c.from.clone(),
                to: c.to.clone(),
                from_port: c.from_port.clone(),
                to_port: c.to_port.clone(),
            })
            .collect();
        SurfaceView {
            nodes,
            edges,
            bounds: session.bounds(),
        }
    }
}

const PREVIEW_FIELDS: [&str; 3] = ["content", "message", "variable"];

/// First non-blank preview field, cut to `max` characters.
fn preview(node: &Node, max: usize) -> String {
    let text = PREVIEW_FIELDS
        .iter()
        .filter_map(|name| node.field(name))
        .find(|value| !value.is_blank())
        .map(|value| value.to_string())
        .unwrap_or_default();
    truncate(&text, max)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

