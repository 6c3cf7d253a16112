//! Base layout in 800x600 reference coordinates and the viewport scale applied to it.

use glam::Vec2;

pub const BASE_WIDTH: f32 = 800.0;
pub const BASE_HEIGHT: f32 = 600.0;

/// Target slot centres, left to right.
pub const TARGET_SLOTS: [Vec2; 5] = [
    Vec2::new(100.0, 400.0),
    Vec2::new(250.0, 400.0),
    Vec2::new(400.0, 400.0),
    Vec2::new(550.0, 400.0),
    Vec2::new(700.0, 400.0),
];
pub const TARGET_SIZE: f32 = 100.0;
pub const TARGET_FILL: u32 = 0xcccccc;
pub const TARGET_STROKE: u32 = 0x000000;
pub const TARGET_STROKE_WIDTH: f32 = 2.0;
pub const LABEL_FONT_SIZE: f32 = 16.0;

pub const SHAPE_ROW_Y: f32 = 100.0;
pub const SHAPE_FIRST_X: f32 = 100.0;
pub const SHAPE_SPACING: f32 = 150.0;
pub const SHAPE_SCALE: f32 = 0.2;
pub const DRAG_ALPHA: f32 = 0.5;

/// Base position of the draggable shape in horizontal slot `slot`.
pub fn shape_slot(slot: usize) -> Vec2 {
    Vec2::new(SHAPE_FIRST_X + SHAPE_SPACING * slot as f32, SHAPE_ROW_Y)
}

/// Viewport-to-base ratio per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale(pub Vec2);

impl Scale {
    pub const IDENTITY: Scale = Scale(Vec2::ONE);

    pub fn for_viewport(viewport: Vec2) -> Self {
        Scale(Vec2::new(viewport.x / BASE_WIDTH, viewport.y / BASE_HEIGHT))
    }

    pub fn x(self) -> f32 {
        self.0.x
    }

    pub fn y(self) -> f32 {
        self.0.y
    }

    /// Maps a base coordinate (or size) into the viewport.
    pub fn apply(self, base: Vec2) -> Vec2 {
        base * self.0
    }

    /// Maps a viewport coordinate back to base coordinates.
    pub fn unapply(self, scaled: Vec2) -> Vec2 {
        scaled / self.0
    }

    pub fn target_size(self) -> Vec2 {
        self.apply(Vec2::splat(TARGET_SIZE))
    }

    /// Font sizes and image scales follow the horizontal factor only.
    pub fn label_font_size(self) -> f32 {
        LABEL_FONT_SIZE * self.x()
    }

    pub fn shape_scale(self) -> f32 {
        SHAPE_SCALE * self.x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_viewport_is_identity() {
        assert_eq!(Scale::for_viewport(Vec2::new(800.0, 600.0)), Scale::IDENTITY);
    }

    #[test]
    fn axes_scale_independently() {
        let scale = Scale::for_viewport(Vec2::new(1600.0, 300.0));
        assert_eq!(scale.x(), 2.0);
        assert_eq!(scale.y(), 0.5);
        assert_eq!(scale.apply(Vec2::new(100.0, 400.0)), Vec2::new(200.0, 200.0));
        assert_eq!(scale.unapply(Vec2::new(200.0, 200.0)), Vec2::new(100.0, 400.0));
        assert_eq!(scale.target_size(), Vec2::new(200.0, 50.0));
        assert_eq!(scale.label_font_size(), 32.0);
        assert!((scale.shape_scale() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn computing_twice_gives_identical_factors() {
        let viewport = Vec2::new(1366.0, 768.0);
        assert_eq!(Scale::for_viewport(viewport), Scale::for_viewport(viewport));
    }

    #[test]
    fn shape_slots_are_evenly_spaced() {
        assert_eq!(shape_slot(0), Vec2::new(100.0, 100.0));
        assert_eq!(shape_slot(4), Vec2::new(700.0, 100.0));
    }
}
