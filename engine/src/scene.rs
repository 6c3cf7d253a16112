use std::collections::BTreeMap;

use glam::Vec2;

use crate::assets::{Assets, MISSING_TEXTURE_SIZE};
use crate::geom::{Color, Rect};

/// Handle to a visual in the [`Scene`]. Ids are never reused, and a higher id
/// is drawn above a lower one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisualId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect {
        size: Vec2,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text {
        text: String,
        font_size: f32,
        color: Color,
    },
    Image {
        texture: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub primitive: Primitive,
    /// Centre of the visual in screen pixels.
    pub position: Vec2,
    pub scale: f32,
    pub alpha: f32,
    pub draggable: bool,
    pub drop_zone: bool,
}

impl Visual {
    fn new(primitive: Primitive, position: Vec2) -> Self {
        Self {
            primitive,
            position,
            scale: 1.0,
            alpha: 1.0,
            draggable: false,
            drop_zone: false,
        }
    }
}

/// Average glyph advance as a fraction of the font size, used for text bounds.
const TEXT_ADVANCE_RATIO: f32 = 0.6;

/// Retained set of visuals plus the viewport they are laid out in.
///
/// The scene holds no GPU state; the renderer reads it once per frame. Setters
/// on a destroyed id are ignored.
pub struct Scene {
    viewport: Vec2,
    visuals: BTreeMap<VisualId, Visual>,
    next_id: u64,
    assets: Assets,
}

impl Scene {
    pub fn new(viewport: Vec2, assets: Assets) -> Self {
        Self {
            viewport,
            visuals: BTreeMap::new(),
            next_id: 0,
            assets,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    fn insert(&mut self, visual: Visual) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.visuals.insert(id, visual);
        id
    }

    pub fn add_rect(&mut self, center: Vec2, size: Vec2, fill: Color, stroke: Option<Stroke>) -> VisualId {
        self.insert(Visual::new(Primitive::Rect { size, fill, stroke }, center))
    }

    pub fn add_text(&mut self, center: Vec2, text: &str, font_size: f32, color: Color) -> VisualId {
        let primitive = Primitive::Text {
            text: text.to_owned(),
            font_size,
            color,
        };
        self.insert(Visual::new(primitive, center))
    }

    pub fn add_image(&mut self, center: Vec2, texture: &str) -> VisualId {
        if !self.assets.contains(texture) {
            log::warn!("image {texture} has no texture, drawing placeholder");
        }
        let primitive = Primitive::Image {
            texture: texture.to_owned(),
        };
        self.insert(Visual::new(primitive, center))
    }

    pub fn destroy(&mut self, id: VisualId) {
        if self.visuals.remove(&id).is_none() {
            log::debug!("destroy of unknown visual {id:?}");
        }
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.visuals.contains_key(&id)
    }

    pub fn get(&self, id: VisualId) -> Option<&Visual> {
        self.visuals.get(&id)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Visuals in draw order, bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (VisualId, &Visual)> {
        self.visuals.iter().map(|(id, visual)| (*id, visual))
    }

    fn with_visual(&mut self, id: VisualId, op: &str, update: impl FnOnce(&mut Visual)) {
        match self.visuals.get_mut(&id) {
            Some(visual) => update(visual),
            None => log::debug!("{op} on unknown visual {id:?}"),
        }
    }

    pub fn set_position(&mut self, id: VisualId, position: Vec2) {
        self.with_visual(id, "set_position", |visual| visual.position = position);
    }

    pub fn set_alpha(&mut self, id: VisualId, alpha: f32) {
        self.with_visual(id, "set_alpha", |visual| visual.alpha = alpha.clamp(0.0, 1.0));
    }

    pub fn set_scale(&mut self, id: VisualId, scale: f32) {
        self.with_visual(id, "set_scale", |visual| visual.scale = scale);
    }

    /// Resizes a rectangle; ignored for other primitives.
    pub fn set_size(&mut self, id: VisualId, new_size: Vec2) {
        self.with_visual(id, "set_size", |visual| {
            if let Primitive::Rect { size, .. } = &mut visual.primitive {
                *size = new_size;
            }
        });
    }

    pub fn set_font_size(&mut self, id: VisualId, new_size: f32) {
        self.with_visual(id, "set_font_size", |visual| {
            if let Primitive::Text { font_size, .. } = &mut visual.primitive {
                *font_size = new_size;
            }
        });
    }

    pub fn set_text(&mut self, id: VisualId, new_text: &str) {
        self.with_visual(id, "set_text", |visual| {
            if let Primitive::Text { text, .. } = &mut visual.primitive {
                new_text.clone_into(text);
            }
        });
    }

    pub fn set_draggable(&mut self, id: VisualId, draggable: bool) {
        self.with_visual(id, "set_draggable", |visual| visual.draggable = draggable);
    }

    pub fn set_drop_zone(&mut self, id: VisualId, drop_zone: bool) {
        self.with_visual(id, "set_drop_zone", |visual| visual.drop_zone = drop_zone);
    }

    /// Screen-space bounds of a visual, centred on its position.
    pub fn bounds(&self, id: VisualId) -> Option<Rect> {
        let visual = self.visuals.get(&id)?;
        Some(Rect::from_center_size(visual.position, self.unscaled_size(visual) * visual.scale))
    }

    fn unscaled_size(&self, visual: &Visual) -> Vec2 {
        match &visual.primitive {
            Primitive::Rect { size, .. } => *size,
            Primitive::Image { texture } => self.assets.size(texture).unwrap_or(MISSING_TEXTURE_SIZE),
            Primitive::Text { text, font_size, .. } => {
                let chars = text.chars().count() as f32;
                Vec2::new(chars * font_size * TEXT_ADVANCE_RATIO, *font_size)
            }
        }
    }

    /// Topmost draggable visual whose bounds contain `point`.
    pub fn topmost_draggable_at(&self, point: Vec2) -> Option<VisualId> {
        self.topmost_where(point, |visual| visual.draggable)
    }

    /// Topmost drop zone whose bounds contain `point`.
    pub fn drop_zone_at(&self, point: Vec2) -> Option<VisualId> {
        self.topmost_where(point, |visual| visual.drop_zone)
    }

    fn topmost_where(&self, point: Vec2, filter: impl Fn(&Visual) -> bool) -> Option<VisualId> {
        self.visuals
            .iter()
            .rev()
            .filter(|(_, visual)| filter(visual))
            .find(|(id, _)| self.bounds(**id).is_some_and(|rect| rect.contains(point)))
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn scene() -> Scene {
        let mut assets = Assets::new();
        assets.insert("ball", RgbaImage::new(40, 20));
        Scene::new(Vec2::new(800.0, 600.0), assets)
    }

    #[test]
    fn image_bounds_follow_texture_size_and_scale() {
        let mut scene = scene();
        let id = scene.add_image(Vec2::new(100.0, 100.0), "ball");
        scene.set_scale(id, 0.5);
        let bounds = scene.bounds(id).unwrap();
        assert_eq!(bounds.min, Vec2::new(90.0, 95.0));
        assert_eq!(bounds.max, Vec2::new(110.0, 105.0));
    }

    #[test]
    fn missing_texture_uses_placeholder_size() {
        let mut scene = scene();
        let id = scene.add_image(Vec2::ZERO, "nope");
        assert_eq!(scene.bounds(id).unwrap().size(), MISSING_TEXTURE_SIZE);
    }

    #[test]
    fn setters_on_destroyed_visuals_are_ignored() {
        let mut scene = scene();
        let id = scene.add_text(Vec2::ZERO, "label", 16.0, Color::BLACK);
        scene.destroy(id);
        scene.set_font_size(id, 32.0);
        scene.set_position(id, Vec2::ONE);
        scene.destroy(id);
        assert!(!scene.contains(id));
        assert!(scene.bounds(id).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn text_setters_only_touch_text() {
        let mut scene = scene();
        let rect = scene.add_rect(Vec2::ZERO, Vec2::splat(10.0), Color::WHITE, None);
        let text = scene.add_text(Vec2::ZERO, "a", 16.0, Color::BLACK);
        scene.set_font_size(rect, 99.0);
        scene.set_text(text, "square");
        scene.set_font_size(text, 32.0);
        scene.set_size(rect, Vec2::splat(20.0));
        assert_eq!(scene.bounds(rect).unwrap().size(), Vec2::splat(20.0));
        match &scene.get(text).unwrap().primitive {
            Primitive::Text { text, font_size, .. } => {
                assert_eq!(text, "square");
                assert_eq!(*font_size, 32.0);
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn hit_tests_pick_the_topmost_match() {
        let mut scene = scene();
        let zone = scene.add_rect(Vec2::new(100.0, 100.0), Vec2::splat(100.0), Color::WHITE, None);
        scene.set_drop_zone(zone, true);
        let lower = scene.add_image(Vec2::new(100.0, 100.0), "ball");
        let upper = scene.add_image(Vec2::new(110.0, 100.0), "ball");
        scene.set_draggable(lower, true);
        scene.set_draggable(upper, true);

        assert_eq!(scene.topmost_draggable_at(Vec2::new(105.0, 100.0)), Some(upper));
        assert_eq!(scene.topmost_draggable_at(Vec2::new(85.0, 100.0)), Some(lower));
        assert_eq!(scene.topmost_draggable_at(Vec2::new(300.0, 300.0)), None);
        assert_eq!(scene.drop_zone_at(Vec2::new(60.0, 60.0)), Some(zone));
        assert_eq!(scene.drop_zone_at(Vec2::new(40.0, 60.0)), None);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut scene = scene();
        let first = scene.add_image(Vec2::ZERO, "ball");
        scene.destroy(first);
        let second = scene.add_image(Vec2::ZERO, "ball");
        assert!(second > first);
        assert_eq!(scene.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![second]);
    }
}
