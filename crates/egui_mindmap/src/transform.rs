use egui::{Pos2, Rect, Vec2};

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 3.0;

/// Affine map from logical canvas coordinates to widget-local screen coordinates:
/// `screen = logical * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Current pan offset
    pub x: f32,
    pub y: f32,
    /// Current zoom factor
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            x: 0.,
            y: 0.,
            scale: 1.,
        }
    }
}

impl ViewTransform {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn logical_to_screen(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.scale + self.offset()).to_pos2()
    }

    pub fn logical_to_screen_size(&self, size: f32) -> f32 {
        size * self.scale
    }

    pub fn logical_to_screen_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(
            self.logical_to_screen(rect.min),
            self.logical_to_screen(rect.max),
        )
    }

    pub fn screen_to_logical(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.offset()) / self.scale).to_pos2()
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Adds `amount` to the scale, clamped to [`MIN_SCALE`, `MAX_SCALE`].
    ///
    /// The offset is recomputed so the logical point under `anchor` keeps its screen position.
    /// Without an anchor the centre of `canvas` is used. Both are widget-local.
    pub fn zoom(&mut self, amount: f32, anchor: Option<Pos2>, canvas: Rect) {
        let new_scale = (self.scale + amount).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }

        let anchor = anchor.unwrap_or(canvas.center()).to_vec2();
        let offset = anchor - (anchor - self.offset()) * (new_scale / self.scale);

        self.x = offset.x;
        self.y = offset.y;
        self.scale = new_scale;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800., 600.))
    }

    fn assert_close(a: Pos2, b: Pos2) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn screen_and_logical_are_inverse() {
        let t = ViewTransform {
            x: 30.,
            y: -12.,
            scale: 1.5,
        };
        let p = Pos2::new(100., 40.);
        assert_close(t.screen_to_logical(t.logical_to_screen(p)), p);
        assert_close(t.screen_to_logical(Pos2::new(30., -12.)), Pos2::ZERO);
        assert_close(t.screen_to_logical(Pos2::new(180., 48.)), p);
    }

    #[test]
    fn zoom_clamps_scale() {
        let mut t = ViewTransform::default();
        for _ in 0..50 {
            t.zoom(0.1, None, canvas());
        }
        assert_eq!(t.scale, MAX_SCALE);
        for _ in 0..100 {
            t.zoom(-0.1, None, canvas());
        }
        assert_eq!(t.scale, MIN_SCALE);
        t.zoom(-5., None, canvas());
        assert_eq!(t.scale, MIN_SCALE);
    }

    #[test]
    fn zoom_keeps_cursor_point_stationary() {
        let mut t = ViewTransform {
            x: -40.,
            y: 25.,
            scale: 1.2,
        };
        let cursor = Pos2::new(310., 95.);
        let under_cursor = t.screen_to_logical(cursor);

        t.zoom(0.3, Some(cursor), canvas());
        assert_close(t.logical_to_screen(under_cursor), cursor);

        t.zoom(-0.8, Some(cursor), canvas());
        assert_close(t.logical_to_screen(under_cursor), cursor);
    }

    #[test]
    fn zoom_without_cursor_uses_canvas_centre() {
        let mut t = ViewTransform::default();
        let centre = canvas().center();
        let under_centre = t.screen_to_logical(centre);
        t.zoom(0.5, None, canvas());
        assert_close(t.logical_to_screen(under_centre), centre);
    }

    #[test]
    fn zoom_at_limit_leaves_offset_alone() {
        let mut t = ViewTransform {
            x: 7.,
            y: 9.,
            scale: MAX_SCALE,
        };
        t.zoom(0.1, Some(Pos2::new(1., 1.)), canvas());
        assert_eq!((t.x, t.y, t.scale), (7., 9., MAX_SCALE));
    }

    #[test]
    fn reset_restores_identity() {
        let mut t = ViewTransform::default();
        t.pan_by(Vec2::new(10., 20.));
        t.zoom(1., None, canvas());
        t.reset();
        assert_eq!(t, ViewTransform::default());
    }
}
