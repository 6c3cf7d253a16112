use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::scene::VisualId;

/// Everything the engine tells a game. Delivered one at a time, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Graphics are ready and the viewport is known.
    Init,
    DragStart {
        visual: VisualId,
        pointer: Vec2,
    },
    /// Where the dragged visual should be, keeping the grab offset.
    Drag {
        visual: VisualId,
        position: Vec2,
    },
    DragEnd {
        visual: VisualId,
    },
    /// Released after a drag; `zone` is the drop zone under the pointer, if any.
    Drop {
        visual: VisualId,
        zone: Option<VisualId>,
        pointer: Vec2,
    },
    DragLeave {
        visual: VisualId,
        zone: VisualId,
    },
    Resize {
        width: u32,
        height: u32,
    },
    Key(KeyCode),
}
