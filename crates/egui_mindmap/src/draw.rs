//! Painting of the canvas. Hit-testing lives in [`crate::geometry`]; both use the same shapes.

use egui::epaint::{CubicBezierShape, PathStroke};
use egui::load::SizedTexture;
use egui::{Align2, Color32, FontFamily, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

use crate::geometry::{self, ConnectionPath};
use crate::model::Node;
use crate::node_types;
use crate::settings::SettingsStyle;
use crate::transform::ViewTransform;

const GRID_SPACING: f32 = 20.;
const CORNER_RADIUS: f32 = 8.;
const PADDING: f32 = 12.;
const TITLE_SIZE: f32 = 14.;
const PREVIEW_SIZE: f32 = 11.;
const DASH: f32 = 6.;

/// Everything needed to place logical shapes on screen.
pub struct DrawContext<'a> {
    pub painter: &'a Painter,
    pub transform: &'a ViewTransform,
    /// Top left of the canvas widget; widget-local positions are relative to it.
    pub origin: Pos2,
    pub style: &'a SettingsStyle,
}

impl DrawContext<'_> {
    pub fn to_screen(&self, logical: Pos2) -> Pos2 {
        self.transform.logical_to_screen(logical) + self.origin.to_vec2()
    }

    pub fn to_screen_rect(&self, logical: Rect) -> Rect {
        self.transform
            .logical_to_screen_rect(logical)
            .translate(self.origin.to_vec2())
    }

    fn size(&self, logical: f32) -> f32 {
        self.transform.logical_to_screen_size(logical)
    }

    fn font(&self, logical: f32) -> FontId {
        FontId::new(self.size(logical).max(1.), FontFamily::Proportional)
    }
}

/// Per-frame view of one node.
pub struct NodeDisplay<'a> {
    pub node: &'a Node,
    /// Note preview; `None` or empty hides it.
    pub preview: Option<&'a str>,
    pub selected: bool,
    /// Label is hidden while the node is being renamed.
    pub editing: bool,
    pub show_anchor: bool,
    /// Loaded texture of an image node's picture.
    pub picture: Option<SizedTexture>,
}

impl NodeDisplay<'_> {
    fn has_preview(&self) -> bool {
        self.preview.is_some_and(|p| !p.is_empty())
    }
}

pub fn draw_background(ctx: &DrawContext, rect: Rect) {
    ctx.painter.rect_filled(rect, 0., ctx.style.canvas_bg);

    let spacing = ctx.size(GRID_SPACING);
    if spacing < 8. {
        return;
    }
    let offset = ctx.transform.offset();
    let first = Vec2::new(offset.x.rem_euclid(spacing), offset.y.rem_euclid(spacing));
    let mut x = rect.left() + first.x;
    while x < rect.right() {
        let mut y = rect.top() + first.y;
        while y < rect.bottom() {
            ctx.painter.circle_filled(Pos2::new(x, y), 1., ctx.style.grid);
            y += spacing;
        }
        x += spacing;
    }
}

pub fn draw_connection(ctx: &DrawContext, path: &ConnectionPath, show_delete: bool) {
    let stroke = Stroke::new(ctx.size(ctx.style.connection.width), ctx.style.connection.color);
    ctx.painter.add(bezier(ctx, path, stroke));

    let head = path
        .arrowhead(geometry::ARROW_LENGTH, geometry::ARROW_WIDTH)
        .map(|p| ctx.to_screen(p));
    ctx.painter
        .add(Shape::convex_polygon(head.to_vec(), stroke.color, Stroke::NONE));

    if show_delete {
        let center = ctx.to_screen(path.mid);
        let radius = ctx.size(geometry::DELETE_BUTTON_RADIUS * 0.6);
        ctx.painter
            .circle(center, radius, ctx.style.delete_fill, Stroke::new(1., Color32::WHITE));
        ctx.painter.text(
            center,
            Align2::CENTER_CENTER,
            "×",
            ctx.font(TITLE_SIZE),
            Color32::WHITE,
        );
    }
}

/// Dashed preview of the connection being drawn.
pub fn draw_pending_connection(ctx: &DrawContext, path: &ConnectionPath) {
    let stroke = Stroke::new(ctx.size(ctx.style.connection.width), ctx.style.connection.color);
    let points = match bezier(ctx, path, stroke) {
        Shape::CubicBezier(curve) => curve.flatten(Some(0.5)),
        _ => return,
    };
    let dash = ctx.size(DASH);
    ctx.painter
        .extend(Shape::dashed_line(&points, stroke, dash, dash));
}

fn bezier(ctx: &DrawContext, path: &ConnectionPath, stroke: Stroke) -> Shape {
    Shape::CubicBezier(CubicBezierShape {
        points: path.points.map(|p| ctx.to_screen(p)),
        closed: false,
        fill: Color32::TRANSPARENT,
        stroke: PathStroke::from(stroke),
    })
}

pub fn draw_node(ctx: &DrawContext, display: &NodeDisplay) {
    let node = display.node;
    let has_preview = display.has_preview();
    let rect = ctx.to_screen_rect(geometry::node_rect(node, has_preview));
    let stroke = if display.selected {
        ctx.style.selected_stroke
    } else {
        ctx.style.node_stroke
    };

    match node.node_type.as_str() {
        node_types::DECISION => draw_decision(ctx, display, rect, stroke),
        node_types::IMAGE => draw_image(ctx, display, rect, stroke),
        _ => draw_card(ctx, display, rect, stroke),
    }

    if display.show_anchor {
        let center = ctx.to_screen(geometry::anchor_center(node, has_preview));
        ctx.painter.circle(
            center,
            ctx.size(geometry::ANCHOR_RADIUS),
            ctx.style.anchor_fill,
            Stroke::new(1.5, ctx.style.node_fill),
        );
    }
}

fn draw_card(ctx: &DrawContext, display: &NodeDisplay, rect: Rect, stroke: Stroke) {
    ctx.painter.rect(
        rect,
        ctx.size(CORNER_RADIUS),
        ctx.style.node_fill,
        stroke,
        StrokeKind::Inside,
    );
    let painter = ctx.painter.with_clip_rect(rect.intersect(ctx.painter.clip_rect()));
    let pad = ctx.size(PADDING);

    if !display.editing {
        let title = format!("{} {}", node_types::icon(&display.node.node_type), display.node.name);
        let y = if display.has_preview() {
            rect.top() + pad + ctx.size(TITLE_SIZE) / 2.
        } else {
            rect.center().y
        };
        painter.text(
            Pos2::new(rect.left() + pad, y),
            Align2::LEFT_CENTER,
            title,
            ctx.font(TITLE_SIZE),
            ctx.style.text,
        );
    }

    if let Some(preview) = display.preview.filter(|p| !p.is_empty()) {
        painter.text(
            Pos2::new(rect.left() + pad, rect.bottom() - pad),
            Align2::LEFT_BOTTOM,
            preview,
            ctx.font(PREVIEW_SIZE),
            ctx.style.weak_text,
        );
    }
}

fn draw_decision(ctx: &DrawContext, display: &NodeDisplay, rect: Rect, stroke: Stroke) {
    ctx.painter.add(Shape::convex_polygon(
        geometry::diamond(rect).to_vec(),
        ctx.style.node_fill,
        stroke,
    ));
    if display.editing {
        return;
    }
    let painter = ctx.painter.with_clip_rect(rect.shrink(rect.width() / 6.));
    painter.text(
        rect.center() - Vec2::new(0., ctx.size(TITLE_SIZE) * 0.7),
        Align2::CENTER_CENTER,
        node_types::icon(&display.node.node_type),
        ctx.font(TITLE_SIZE),
        ctx.style.text,
    );
    painter.text(
        rect.center() + Vec2::new(0., ctx.size(TITLE_SIZE) * 0.7),
        Align2::CENTER_CENTER,
        &display.node.name,
        ctx.font(TITLE_SIZE * 0.9),
        ctx.style.text,
    );
}

fn draw_image(ctx: &DrawContext, display: &NodeDisplay, rect: Rect, stroke: Stroke) {
    ctx.painter.rect(
        rect,
        ctx.size(CORNER_RADIUS),
        ctx.style.node_fill,
        stroke,
        StrokeKind::Inside,
    );
    let pad = ctx.size(PADDING);
    let frame = Rect::from_min_max(
        rect.min + Vec2::splat(pad),
        rect.max - Vec2::new(pad, pad + ctx.size(TITLE_SIZE) * 1.5),
    );
    ctx.painter
        .rect_filled(frame, ctx.size(CORNER_RADIUS / 2.), ctx.style.canvas_bg);

    if let Some(picture) = display.picture {
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1., 1.));
        ctx.painter.image(
            picture.id,
            geometry::fit_rect(frame, picture.size),
            uv,
            Color32::WHITE,
        );
    } else {
        let has_image = display.node.properties.image_data.is_some();
        ctx.painter.text(
            frame.center(),
            Align2::CENTER_CENTER,
            if has_image { "🖼" } else { "🖼 no image" },
            ctx.font(if has_image { TITLE_SIZE * 2. } else { PREVIEW_SIZE }),
            ctx.style.weak_text,
        );
    }

    if !display.editing {
        let painter = ctx.painter.with_clip_rect(rect.intersect(ctx.painter.clip_rect()));
        painter.text(
            Pos2::new(rect.center().x, rect.bottom() - pad),
            Align2::CENTER_BOTTOM,
            &display.node.name,
            ctx.font(TITLE_SIZE),
            ctx.style.text,
        );
    }
}
