use eframe::egui::{Pos2, Vec2};

pub(in crate::app) const MIN_SCALE: f32 = 0.2;
pub(in crate::app) const MAX_SCALE: f32 = 6.0;
const ZOOM_IN_FACTOR: f32 = 1.1;
const ZOOM_OUT_FACTOR: f32 = 0.9;

/// World to device-pixel mapping: `screen = world * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewportTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewportTransform {
    pub(in crate::app) fn world_to_screen(self, world: Vec2) -> Pos2 {
        (world * self.scale + self.offset).to_pos2()
    }

    pub(in crate::app) fn screen_to_world(self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.offset) / self.scale
    }
}

/// Pan/zoom state for one canvas. Raw pointer positions arrive in logical
/// points relative to the window; they are moved into canvas-local device
/// pixels before any transform math.
#[derive(Clone, Debug)]
pub(in crate::app) struct ViewportController {
    transform: ViewportTransform,
    origin: Pos2,
    pixels_per_point: f32,
    /// Last raw pointer position of an active drag.
    drag: Option<Pos2>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            transform: ViewportTransform::default(),
            origin: Pos2::ZERO,
            pixels_per_point: 1.0,
            drag: None,
        }
    }
}

impl ViewportController {
    #[cfg(test)]
    pub(in crate::app) fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub(in crate::app) fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub(in crate::app) fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    pub(in crate::app) fn set_surface(&mut self, origin: Pos2, pixels_per_point: f32) {
        self.origin = origin;
        self.pixels_per_point = if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            pixels_per_point
        } else {
            1.0
        };
    }

    pub(in crate::app) fn to_device(&self, raw: Pos2) -> Pos2 {
        ((raw - self.origin) * self.pixels_per_point).to_pos2()
    }

    pub(in crate::app) fn to_points(&self, device: Pos2) -> Pos2 {
        self.origin + device.to_vec2() / self.pixels_per_point
    }

    pub(in crate::app) fn world_to_points(&self, world: Vec2) -> Pos2 {
        self.to_points(self.transform.world_to_screen(world))
    }

    pub(in crate::app) fn raw_to_world(&self, raw: Pos2) -> Vec2 {
        self.transform.screen_to_world(self.to_device(raw))
    }

    /// Scales about `anchor` (device pixels) so the world point under it stays put.
    pub(in crate::app) fn zoom(&mut self, delta: f32, anchor: Pos2) {
        let factor = if delta > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        let scale = (self.transform.scale * factor).clamp(MIN_SCALE, MAX_SCALE);

        let world = self.transform.screen_to_world(anchor);
        self.transform.scale = scale;
        self.transform.offset = anchor.to_vec2() - world * scale;
    }

    pub(in crate::app) fn zoom_at_raw(&mut self, delta: f32, raw: Pos2) {
        self.zoom(delta, self.to_device(raw));
    }

    pub(in crate::app) fn pan(&mut self, delta: Vec2) {
        self.transform.offset += delta;
    }

    pub(in crate::app) fn begin_drag(&mut self, raw: Pos2) {
        self.drag = Some(raw);
    }

    /// Device-pixel motion since the previous drag update, or `None` when no
    /// drag is active. The caller applies it with `pan`.
    pub(in crate::app) fn drag_to(&mut self, raw: Pos2) -> Option<Vec2> {
        let last = self.drag.as_mut()?;
        let moved = (raw - *last) * self.pixels_per_point;
        *last = raw;
        Some(moved)
    }

    pub(in crate::app) fn end_drag(&mut self) {
        self.drag = None;
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub(in crate::app) fn reset(&mut self) {
        self.transform = ViewportTransform::default();
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use proptest::prelude::*;

    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() <= 1e-2 + 1e-4 * a.length().max(b.length())
    }

    #[test]
    fn zoom_in_and_out_use_fixed_factors() {
        let mut viewport = ViewportController::default();
        viewport.zoom(-1.0, pos2(0.0, 0.0));
        assert!((viewport.scale() - 1.1).abs() < 1e-6);
        viewport.zoom(1.0, pos2(0.0, 0.0));
        assert!((viewport.scale() - 0.99).abs() < 1e-6);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = ViewportController::default();
        for _ in 0..100 {
            viewport.zoom(-1.0, pos2(10.0, 10.0));
        }
        assert_eq!(viewport.scale(), MAX_SCALE);
        for _ in 0..200 {
            viewport.zoom(1.0, pos2(10.0, 10.0));
        }
        assert_eq!(viewport.scale(), MIN_SCALE);
    }

    #[test]
    fn zoom_keeps_the_anchor_fixed() {
        let mut viewport = ViewportController::default();
        viewport.pan(vec2(40.0, -25.0));
        let anchor = pos2(310.0, 120.0);

        for delta in [-3.0, -1.0, 2.0, -0.5, 8.0] {
            let before = viewport.transform().screen_to_world(anchor);
            viewport.zoom(delta, anchor);
            let after = viewport.transform().screen_to_world(anchor);
            assert!(close(before, after), "{before:?} vs {after:?}");
        }
    }

    #[test]
    fn raw_input_is_scaled_by_pixel_density() {
        let mut viewport = ViewportController::default();
        viewport.set_surface(pos2(100.0, 50.0), 2.0);

        assert_eq!(viewport.to_device(pos2(110.0, 60.0)), pos2(20.0, 20.0));
        assert_eq!(viewport.to_points(pos2(20.0, 20.0)), pos2(110.0, 60.0));

        let before = viewport.raw_to_world(pos2(150.0, 90.0));
        viewport.zoom_at_raw(-1.0, pos2(150.0, 90.0));
        let after = viewport.raw_to_world(pos2(150.0, 90.0));
        assert!(close(before, after));
    }

    #[test]
    fn dragging_pans_by_device_pixels() {
        let mut viewport = ViewportController::default();
        viewport.set_surface(Pos2::ZERO, 2.0);

        assert_eq!(viewport.drag_to(pos2(5.0, 5.0)), None);
        assert!(!viewport.is_dragging());
        viewport.begin_drag(pos2(10.0, 10.0));
        for pointer in [pos2(15.0, 12.0), pos2(20.0, 13.0)] {
            if let Some(delta) = viewport.drag_to(pointer) {
                viewport.pan(delta);
            }
        }
        assert_eq!(viewport.transform().offset, vec2(20.0, 6.0));
        viewport.end_drag();
        assert!(!viewport.is_dragging());
    }

    #[test]
    fn reset_restores_identity() {
        let mut viewport = ViewportController::default();
        viewport.pan(vec2(3.0, 4.0));
        viewport.zoom(-1.0, pos2(1.0, 1.0));
        viewport.reset();
        assert_eq!(viewport.transform(), ViewportTransform::default());
    }

    #[test]
    fn invalid_pixel_density_falls_back_to_one() {
        let mut viewport = ViewportController::default();
        viewport.set_surface(Pos2::ZERO, 0.0);
        assert_eq!(viewport.pixels_per_point(), 1.0);
    }

    proptest! {
        #[test]
        fn screen_to_world_inverts_world_to_screen(
            scale in MIN_SCALE..MAX_SCALE,
            ox in -2000.0f32..2000.0,
            oy in -2000.0f32..2000.0,
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
        ) {
            let transform = ViewportTransform { scale, offset: vec2(ox, oy) };
            let world = vec2(x, y);
            let back = transform.screen_to_world(transform.world_to_screen(world));
            prop_assert!(close(world, back));
        }
    }
}
