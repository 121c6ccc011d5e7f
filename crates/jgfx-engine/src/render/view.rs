use std::cell::Cell;

use crate::coords::{Rect, Transform, Vec2};

/// 2D camera: a world-space rectangle mapped onto a viewport of the
/// target.
///
/// The viewport is expressed as a normalized (0..1) rectangle of the
/// target so a view keeps meaning across target resizes. The
/// world-to-device transform and its inverse are derived from
/// center/size/rotation and cached until a setter invalidates them.
#[derive(Debug, Clone)]
pub struct View {
    center: Vec2,
    size: Vec2,
    /// Rotation in degrees, clockwise with +Y down.
    rotation: f32,
    viewport: Rect,
    transform: Cell<Option<Transform>>,
    inverse_transform: Cell<Option<Transform>>,
}

impl View {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            viewport: Rect::full(),
            transform: Cell::new(None),
            inverse_transform: Cell::new(None),
        }
    }

    /// View showing exactly the given world rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        self.invalidate();
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.invalidate();
    }

    /// Sets the rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees.rem_euclid(360.0);
        self.invalidate();
    }

    /// Sets the normalized (0..1) viewport rectangle.
    ///
    /// The viewport does not affect the world-to-device transform, only
    /// where on the target the view is displayed.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn move_by(&mut self, offset: Vec2) {
        self.set_center(self.center + offset);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Scales the visible world rectangle; `factor > 1` shows more.
    pub fn zoom(&mut self, factor: f32) {
        self.set_size(self.size * factor);
    }

    /// World-to-device transform of this view.
    pub fn transform(&self) -> Transform {
        if let Some(cached) = self.transform.get() {
            return cached;
        }

        let radians = self.rotation.to_radians();
        let (sin, cos) = radians.sin_cos();
        let tx = -self.center.x * cos - self.center.y * sin + self.center.x;
        let ty = self.center.x * sin - self.center.y * cos + self.center.y;

        // Device coordinates span [-1, 1] with +Y up.
        let a = 2.0 / self.size.x;
        let b = -2.0 / self.size.y;
        let c = -a * self.center.x;
        let d = -b * self.center.y;

        let transform = Transform::new(
            a * cos,
            a * sin,
            a * tx + c,
            -b * sin,
            b * cos,
            b * ty + d,
            0.0,
            0.0,
            1.0,
        );
        self.transform.set(Some(transform));
        transform
    }

    /// Inverse of [`transform`](Self::transform).
    pub fn inverse_transform(&self) -> Transform {
        if let Some(cached) = self.inverse_transform.get() {
            return cached;
        }

        let inverse = self.transform().inverse();
        self.inverse_transform.set(Some(inverse));
        inverse
    }

    fn invalidate(&mut self) {
        self.transform.set(None);
        self.inverse_transform.set(None);
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        // Cached matrices are derived state and excluded deliberately.
        self.center == other.center
            && self.size == other.size
            && self.rotation == other.rotation
            && self.viewport == other.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(
            (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4,
            "{a:?} != {b:?}"
        );
    }

    // ── transform ─────────────────────────────────────────────────────────

    #[test]
    fn default_view_maps_world_rect_to_device_square() {
        let view = View::from_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
        let t = view.transform();

        assert_close(t.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_close(t.transform_point(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_close(t.transform_point(Vec2::new(400.0, 300.0)), Vec2::zero());
    }

    #[test]
    fn inverse_round_trips() {
        let mut view = View::from_rect(Rect::new(10.0, 20.0, 200.0, 100.0));
        view.set_rotation(30.0);

        let p = Vec2::new(57.0, 43.0);
        let device = view.transform().transform_point(p);
        assert_close(view.inverse_transform().transform_point(device), p);
    }

    #[test]
    fn setters_invalidate_cached_transform() {
        let mut view = View::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let before = view.transform();

        view.move_by(Vec2::new(50.0, 0.0));
        assert_ne!(view.transform(), before);
    }

    #[test]
    fn rotation_wraps_into_range() {
        let mut view = View::new(Vec2::zero(), Vec2::new(2.0, 2.0));
        view.set_rotation(-90.0);
        assert_eq!(view.rotation(), 270.0);
        view.set_rotation(720.0);
        assert_eq!(view.rotation(), 0.0);
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    #[test]
    fn zoom_scales_visible_size() {
        let mut view = View::new(Vec2::zero(), Vec2::new(100.0, 50.0));
        view.zoom(2.0);
        assert_eq!(view.size(), Vec2::new(200.0, 100.0));
    }
}
