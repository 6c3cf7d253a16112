//! Per-shape drag feedback. Placement is decided on drop.

use engine::{Scene, VisualId};
use glam::Vec2;

use crate::layout::DRAG_ALPHA;
use crate::round::Round;

impl Round {
    /// Fades the shape while it is held. Returns false for visuals that are
    /// not shapes of this round.
    pub fn drag_start(&mut self, scene: &mut Scene, visual: VisualId) -> bool {
        if self.shape(visual).is_none() {
            return false;
        }
        scene.set_alpha(visual, DRAG_ALPHA);
        log::debug!("dragging {visual:?}");
        true
    }

    /// Follows every pointer sample, unfiltered.
    pub fn drag_move(&mut self, scene: &mut Scene, visual: VisualId, position: Vec2) -> bool {
        let scale = self.scale;
        let Some(shape) = self.shape_mut(visual) else {
            return false;
        };
        shape.move_to(scene, position, scale);
        log::trace!("{} dragged to {position}", shape.kind.name());
        true
    }

    pub fn drag_end(&mut self, scene: &mut Scene, visual: VisualId) -> bool {
        if self.shape(visual).is_none() {
            return false;
        }
        scene.set_alpha(visual, 1.0);
        log::debug!("dragged {visual:?}");
        true
    }
}
