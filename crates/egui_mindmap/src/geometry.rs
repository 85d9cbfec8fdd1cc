//! Logical-space shapes of nodes and connections, shared by drawing and hit-testing.

use egui::{Pos2, Rect, Vec2};

use crate::model::Node;
use crate::node_types;

pub const CARD_SIZE: Vec2 = Vec2::new(200., 60.);
pub const CARD_WITH_PREVIEW_SIZE: Vec2 = Vec2::new(200., 80.);
pub const DECISION_SIZE: Vec2 = Vec2::new(120., 120.);
pub const IMAGE_SIZE: Vec2 = Vec2::new(200., 150.);

/// Radius of the connection handle on the right edge of a node.
pub const ANCHOR_RADIUS: f32 = 8.;
/// Distance by which connection ends stop short of the target centre.
pub const ARROW_PADDING: f32 = 20.;
pub const ARROW_LENGTH: f32 = 12.;
pub const ARROW_WIDTH: f32 = 9.;
/// Radius of the clickable delete button at a connection midpoint.
pub const DELETE_BUTTON_RADIUS: f32 = 16.;

pub fn node_size(node: &Node, has_preview: bool) -> Vec2 {
    match node.node_type.as_str() {
        node_types::DECISION => DECISION_SIZE,
        node_types::IMAGE => IMAGE_SIZE,
        _ if has_preview => CARD_WITH_PREVIEW_SIZE,
        _ => CARD_SIZE,
    }
}

pub fn node_rect(node: &Node, has_preview: bool) -> Rect {
    Rect::from_min_size(node.location(), node_size(node, has_preview))
}

/// Whether `pos` lies on the node's painted shape. Decision nodes are diamonds.
pub fn node_contains(node: &Node, has_preview: bool, pos: Pos2) -> bool {
    let rect = node_rect(node, has_preview);
    if node.node_type != node_types::DECISION {
        return rect.contains(pos);
    }
    let d = pos - rect.center();
    d.x.abs() / (rect.width() / 2.) + d.y.abs() / (rect.height() / 2.) <= 1.
}

/// Diamond corners of a decision node, clockwise from the top.
pub fn diamond(rect: Rect) -> [Pos2; 4] {
    [
        rect.center_top(),
        rect.right_center(),
        rect.center_bottom(),
        rect.left_center(),
    ]
}

pub fn anchor_center(node: &Node, has_preview: bool) -> Pos2 {
    node_rect(node, has_preview).right_center()
}

pub fn anchor_contains(node: &Node, has_preview: bool, pos: Pos2) -> bool {
    anchor_center(node, has_preview).distance(pos) <= ANCHOR_RADIUS
}

/// Largest rect of `size`'s aspect ratio centred in `frame`.
pub fn fit_rect(frame: Rect, size: Vec2) -> Rect {
    if size.x <= 0. || size.y <= 0. {
        return frame;
    }
    let scale = (frame.width() / size.x).min(frame.height() / size.y);
    Rect::from_center_size(frame.center(), size * scale)
}

/// Bezier geometry of a connection in logical space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionPath {
    /// Start, two control points, end.
    pub points: [Pos2; 4],
    /// Point halfway between start and end; the delete button sits here.
    pub mid: Pos2,
}

impl ConnectionPath {
    /// Path between two node centres, ending [`ARROW_PADDING`] before the target.
    ///
    /// `None` when both centres coincide.
    pub fn between(start: Pos2, target: Pos2) -> Option<Self> {
        let d = target - start;
        let distance = d.length();
        if distance == 0. {
            return None;
        }
        let end = target - d / distance * ARROW_PADDING;
        Some(Self::open(start, end))
    }

    /// Path straight to `end`, used for the pending connection preview.
    pub fn open(start: Pos2, end: Pos2) -> Self {
        let mid = start + (end - start) * 0.5;
        Self {
            points: [
                start,
                Pos2::new(mid.x, start.y),
                Pos2::new(mid.x, end.y),
                end,
            ],
            mid,
        }
    }

    pub fn end(&self) -> Pos2 {
        self.points[3]
    }

    /// Unit direction of the curve where it meets the end point.
    pub fn end_direction(&self) -> Vec2 {
        let [start, _, c2, end] = self.points;
        let tangent = end - c2;
        if tangent.length_sq() > f32::EPSILON {
            return tangent.normalized();
        }
        (end - start).normalized()
    }

    /// Arrowhead triangle with its tip on the end point.
    pub fn arrowhead(&self, length: f32, width: f32) -> [Pos2; 3] {
        let dir = self.end_direction();
        let normal = dir.rot90();
        let tip = self.end();
        let base = tip - dir * length;
        [tip, base + normal * (width / 2.), base - normal * (width / 2.)]
    }

    pub fn delete_button_contains(&self, pos: Pos2) -> bool {
        self.mid.distance(pos) <= DELETE_BUTTON_RADIUS
    }
}
