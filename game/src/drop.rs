use engine::{Scene, VisualId};

use crate::round::Round;
use crate::shape::ShapeKind;

/// How a drop was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Snapped onto its own target; the target's label is gone for good.
    Matched { target: ShapeKind },
    /// Overlapped another kind's target and went back to its origin.
    Mismatched { target: ShapeKind },
    /// Overlapped no target and went back to its origin.
    NoTarget,
}

impl Round {
    /// Resolves a released shape against the targets, in round order.
    ///
    /// The first target whose zone overlaps the shape's bounds decides the
    /// outcome. Returns `None` if `visual` is not a shape of this round.
    pub fn resolve_drop(&mut self, scene: &mut Scene, visual: VisualId) -> Option<DropOutcome> {
        let scale = self.scale;
        let shape_bounds = scene.bounds(visual);
        let hit = shape_bounds.and_then(|bounds| {
            self.targets
                .iter()
                .position(|target| target.bounds(scale).intersects(&bounds))
        });
        let shape = self.shapes.iter_mut().find(|shape| shape.visual == visual)?;

        let Some(index) = hit else {
            log::info!("no target for {}, returning to origin", shape.kind.name());
            shape.return_to_origin(scene);
            return Some(DropOutcome::NoTarget);
        };

        let target = &mut self.targets[index];
        if shape.id() != target.id() {
            log::info!("{} does not match {}", shape.kind.name(), target.kind.name());
            shape.return_to_origin(scene);
            return Some(DropOutcome::Mismatched { target: target.kind });
        }

        log::info!("{} matches its target", shape.kind.name());
        shape.position = target.position;
        shape.base_position = target.base_position;
        scene.set_position(shape.visual, target.position);
        if let Some(label) = target.label.take() {
            log::debug!("removing label for {}", target.kind.name());
            scene.destroy(label);
        }
        Some(DropOutcome::Matched { target: target.kind })
    }
}
