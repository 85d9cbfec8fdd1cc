use egui::{Pos2, Vec2};

use crate::model::Node;
use crate::reducer::Action;
use crate::transform::ViewTransform;

/// Connection being drawn from a node towards the pointer. Logical coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingConnection {
    pub from: String,
    pub start: Pos2,
    pub end: Pos2,
}

/// What the primary pointer is doing on the canvas.
///
/// Pointer positions passed in are widget-local screen coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingNode {
        node_id: String,
        /// Pointer position minus the node's screen position at grab time.
        grab: Vec2,
    },
    DrawingConnection(PendingConnection),
    Panning,
}

impl Interaction {
    pub fn begin_drag(node: &Node, pointer: Pos2, t: &ViewTransform) -> Self {
        let grab = pointer - t.logical_to_screen(node.location());
        Self::DraggingNode {
            node_id: node.id.clone(),
            grab,
        }
    }

    /// Starts a connection at `start` (the node centre, logical).
    pub fn begin_connection(node: &Node, start: Pos2, pointer: Pos2, t: &ViewTransform) -> Self {
        Self::DrawingConnection(PendingConnection {
            from: node.id.clone(),
            start,
            end: t.screen_to_logical(pointer),
        })
    }

    pub fn begin_pan() -> Self {
        Self::Panning
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn dragged_node(&self) -> Option<&str> {
        match self {
            Self::DraggingNode { node_id, .. } => Some(node_id),
            _ => None,
        }
    }

    pub fn pending_connection(&self) -> Option<&PendingConnection> {
        match self {
            Self::DrawingConnection(p) => Some(p),
            _ => None,
        }
    }

    /// Feeds a pointer move. `delta` is the screen-space movement since the last call.
    ///
    /// Returns the action a node drag produces; panning and connection previews only
    /// change local state.
    pub fn pointer_moved(
        &mut self,
        pointer: Pos2,
        delta: Vec2,
        t: &mut ViewTransform,
    ) -> Option<Action> {
        match self {
            Self::Idle => None,
            Self::DraggingNode { node_id, grab } => {
                let pos = ((pointer - t.offset() - *grab).to_vec2() / t.scale).to_pos2();
                Some(Action::move_node(node_id.clone(), pos.x, pos.y))
            }
            Self::DrawingConnection(pending) => {
                pending.end = t.screen_to_logical(pointer);
                None
            }
            Self::Panning => {
                if delta != Vec2::ZERO {
                    t.pan_by(delta);
                }
                None
            }
        }
    }

    /// Ends the current gesture. `target` is the node under the pointer, if any.
    pub fn pointer_released(&mut self, target: Option<&str>) -> Option<Action> {
        let finished = std::mem::take(self);
        match (finished, target) {
            (Self::DrawingConnection(pending), Some(to)) => {
                Some(Action::add_connection(pending.from, to))
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new("n", "idea", "N", 100., 50.)
    }

    #[test]
    fn drag_keeps_grab_offset() {
        let mut t = ViewTransform {
            x: 20.,
            y: 10.,
            scale: 2.,
        };
        let n = node();
        // node at screen (220, 110); grab it 15px right, 5px down
        let mut i = Interaction::begin_drag(&n, Pos2::new(235., 115.), &t);
        assert_eq!(i.dragged_node(), Some("n"));

        let action = i.pointer_moved(Pos2::new(255., 135.), Vec2::new(20., 20.), &mut t);
        assert_eq!(action, Some(Action::move_node("n", 110., 60.)));

        assert_eq!(i.pointer_released(Some("n")), None);
        assert!(i.is_idle());
    }

    #[test]
    fn connection_commits_on_target() {
        let mut t = ViewTransform::default();
        let n = node();
        let mut i = Interaction::begin_connection(&n, Pos2::new(200., 80.), Pos2::new(300., 80.), &t);
        assert_eq!(i.pending_connection().unwrap().end, Pos2::new(300., 80.));

        assert_eq!(i.pointer_moved(Pos2::new(400., 90.), Vec2::ZERO, &mut t), None);
        assert_eq!(i.pending_connection().unwrap().end, Pos2::new(400., 90.));

        assert_eq!(
            i.pointer_released(Some("m")),
            Some(Action::add_connection("n", "m"))
        );
        assert!(i.is_idle());
    }

    #[test]
    fn connection_released_on_empty_canvas_is_dropped() {
        let t = ViewTransform::default();
        let mut i = Interaction::begin_connection(&node(), Pos2::ZERO, Pos2::ZERO, &t);
        assert_eq!(i.pointer_released(None), None);
        assert!(i.is_idle());
    }

    #[test]
    fn panning_moves_transform() {
        let mut t = ViewTransform::default();
        let mut i = Interaction::begin_pan();
        assert_eq!(i.pointer_moved(Pos2::ZERO, Vec2::new(5., -3.), &mut t), None);
        assert_eq!((t.x, t.y), (5., -3.));
        assert_eq!(i.pointer_released(None), None);
    }
}
