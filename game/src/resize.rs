use engine::Scene;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layout::Scale;
use crate::round::Round;

/// How entity positions follow a viewport change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Recompute every position from its base coordinates. Resizing back to a
    /// previous size restores the previous layout exactly.
    #[default]
    Absolute,
    /// Multiply current positions by the new scale factors, as the first
    /// browser version of the game did. Repeated resizes compound, and shapes
    /// keep their round-start origin in the old coordinates.
    Compounding,
}

impl Round {
    pub fn resize(&mut self, scene: &mut Scene, viewport: Vec2, policy: ResizePolicy) {
        let scale = Scale::for_viewport(viewport);
        log::debug!("rescaling round by {:?} ({policy:?})", scale.0);

        for target in &mut self.targets {
            target.position = match policy {
                ResizePolicy::Absolute => scale.apply(target.base_position),
                ResizePolicy::Compounding => scale.apply(target.position),
            };
            scene.set_position(target.zone, target.position);
            scene.set_size(target.zone, scale.target_size());
            if let Some(label) = target.label {
                scene.set_font_size(label, scale.label_font_size());
                scene.set_position(label, target.position);
            }
        }

        for shape in &mut self.shapes {
            match policy {
                ResizePolicy::Absolute => {
                    shape.position = scale.apply(shape.base_position);
                    shape.origin = scale.apply(shape.base_origin);
                }
                ResizePolicy::Compounding => shape.position = scale.apply(shape.position),
            }
            scene.set_position(shape.visual, shape.position);
            scene.set_scale(shape.visual, scale.shape_scale());
        }

        self.scale = scale;
    }
}
