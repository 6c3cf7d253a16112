use engine::{Color, Rect, Scene, Stroke, VisualId};
use glam::Vec2;
use rand::Rng;

use crate::layout::{
    shape_slot, Scale, TARGET_FILL, TARGET_SLOTS, TARGET_STROKE, TARGET_STROKE_WIDTH,
};
use crate::shape::ShapeKind;

/// In-place Fisher–Yates: for `i` from the last index down to 1, swap with a
/// uniform `j` in `0..=i`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Drop zone for one shape kind. Shows the kind's name until solved.
#[derive(Clone, Debug)]
pub struct Target {
    pub kind: ShapeKind,
    /// Centre in viewport pixels.
    pub position: Vec2,
    /// Centre in base coordinates.
    pub base_position: Vec2,
    pub zone: VisualId,
    /// Cleared for good once the matching shape lands here.
    pub label: Option<VisualId>,
}

impl Target {
    pub fn id(&self) -> usize {
        self.kind.id()
    }

    pub fn is_solved(&self) -> bool {
        self.label.is_none()
    }

    pub fn bounds(&self, scale: Scale) -> Rect {
        Rect::from_center_size(self.position, scale.target_size())
    }
}

#[derive(Clone, Debug)]
pub struct DraggableShape {
    pub kind: ShapeKind,
    pub visual: VisualId,
    pub position: Vec2,
    pub base_position: Vec2,
    /// Where failed drops return to: the round-start position.
    pub origin: Vec2,
    pub base_origin: Vec2,
}

impl DraggableShape {
    pub fn id(&self) -> usize {
        self.kind.id()
    }

    /// Moves the shape (logical record and visual) to a viewport position.
    pub(crate) fn move_to(&mut self, scene: &mut Scene, position: Vec2, scale: Scale) {
        self.position = position;
        self.base_position = scale.unapply(position);
        scene.set_position(self.visual, position);
    }

    pub(crate) fn return_to_origin(&mut self, scene: &mut Scene) {
        self.position = self.origin;
        self.base_position = self.base_origin;
        scene.set_position(self.visual, self.origin);
    }
}

/// One shuffled assignment of five shapes to five targets.
pub struct Round {
    pub(crate) targets: Vec<Target>,
    pub(crate) shapes: Vec<DraggableShape>,
    pub(crate) scale: Scale,
}

impl Round {
    /// Lays out a fresh round for the scene's current viewport.
    pub fn generate<R: Rng + ?Sized>(scene: &mut Scene, rng: &mut R) -> Self {
        let scale = Scale::for_viewport(scene.viewport());

        let mut target_kinds = ShapeKind::ALL;
        shuffle(&mut target_kinds, rng);
        let targets = target_kinds
            .iter()
            .zip(TARGET_SLOTS)
            .map(|(&kind, base_position)| Self::spawn_target(scene, kind, base_position, scale))
            .collect();

        let mut shape_kinds = ShapeKind::ALL;
        shuffle(&mut shape_kinds, rng);
        let shapes = shape_kinds
            .iter()
            .enumerate()
            .map(|(slot, &kind)| Self::spawn_shape(scene, kind, shape_slot(slot), scale))
            .collect();

        let round = Self {
            targets,
            shapes,
            scale,
        };
        log::info!(
            "round started: targets {:?}, shapes {:?}",
            round.targets.iter().map(|t| t.kind.name()).collect::<Vec<_>>(),
            round.shapes.iter().map(|s| s.kind.name()).collect::<Vec<_>>(),
        );
        round
    }

    fn spawn_target(scene: &mut Scene, kind: ShapeKind, base_position: Vec2, scale: Scale) -> Target {
        let position = scale.apply(base_position);
        let stroke = Stroke {
            width: TARGET_STROKE_WIDTH,
            color: Color::from_rgb_hex(TARGET_STROKE),
        };
        let zone = scene.add_rect(
            position,
            scale.target_size(),
            Color::from_rgb_hex(TARGET_FILL),
            Some(stroke),
        );
        scene.set_drop_zone(zone, true);
        let label = scene.add_text(position, kind.name(), scale.label_font_size(), Color::BLACK);
        Target {
            kind,
            position,
            base_position,
            zone,
            label: Some(label),
        }
    }

    fn spawn_shape(scene: &mut Scene, kind: ShapeKind, base_position: Vec2, scale: Scale) -> DraggableShape {
        let position = scale.apply(base_position);
        let visual = scene.add_image(position, kind.name());
        scene.set_scale(visual, scale.shape_scale());
        scene.set_draggable(visual, true);
        DraggableShape {
            kind,
            visual,
            position,
            base_position,
            origin: position,
            base_origin: base_position,
        }
    }

    /// Destroys every visual the round created, targets included.
    pub fn teardown(self, scene: &mut Scene) {
        for shape in self.shapes {
            scene.destroy(shape.visual);
        }
        for target in self.targets {
            scene.destroy(target.zone);
            if let Some(label) = target.label {
                scene.destroy(label);
            }
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn shapes(&self) -> &[DraggableShape] {
        &self.shapes
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn shape(&self, visual: VisualId) -> Option<&DraggableShape> {
        self.shapes.iter().find(|shape| shape.visual == visual)
    }

    pub(crate) fn shape_mut(&mut self, visual: VisualId) -> Option<&mut DraggableShape> {
        self.shapes.iter_mut().find(|shape| shape.visual == visual)
    }

    pub fn target(&self, kind: ShapeKind) -> Option<&Target> {
        self.targets.iter().find(|target| target.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.targets.iter().all(Target::is_solved)
    }
}
