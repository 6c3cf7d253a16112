use glam::Vec2;

use crate::event::Event;
use crate::scene::{Scene, VisualId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
    pointer_id: PointerId,
    visual: VisualId,
    grab_offset: Vec2,
    over_zone: Option<VisualId>,
}

/// Turns raw pointer samples into drag and drop events.
///
/// Only one drag is tracked at a time; samples from other pointers are ignored
/// until it ends.
#[derive(Debug, Default)]
pub struct DragTracker {
    mouse: Vec2,
    active: Option<ActiveDrag>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<VisualId> {
        self.active.map(|drag| drag.visual)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse
    }

    pub fn pointer_pressed(&mut self, scene: &Scene, pointer_id: PointerId, position: Vec2) -> Vec<Event> {
        if pointer_id == PointerId::Mouse {
            self.mouse = position;
        }
        if self.active.is_some() {
            return Vec::new();
        }
        let Some(visual) = scene.topmost_draggable_at(position) else {
            return Vec::new();
        };
        let Some(center) = scene.get(visual).map(|visual| visual.position) else {
            return Vec::new();
        };
        log::trace!("drag start on {visual:?} at {position}");
        self.active = Some(ActiveDrag {
            pointer_id,
            visual,
            grab_offset: position - center,
            over_zone: scene.drop_zone_at(position),
        });
        vec![Event::DragStart {
            visual,
            pointer: position,
        }]
    }

    pub fn pointer_moved(&mut self, scene: &Scene, pointer_id: PointerId, position: Vec2) -> Vec<Event> {
        if pointer_id == PointerId::Mouse {
            self.mouse = position;
        }
        let Some(mut drag) = self.active_for(scene, pointer_id) else {
            return Vec::new();
        };
        let mut events = vec![Event::Drag {
            visual: drag.visual,
            position: position - drag.grab_offset,
        }];
        let zone = scene.drop_zone_at(position);
        if let Some(left) = drag.over_zone.filter(|previous| Some(*previous) != zone) {
            events.push(Event::DragLeave {
                visual: drag.visual,
                zone: left,
            });
        }
        drag.over_zone = zone;
        self.active = Some(drag);
        events
    }

    pub fn pointer_released(&mut self, scene: &Scene, pointer_id: PointerId, position: Vec2) -> Vec<Event> {
        if pointer_id == PointerId::Mouse {
            self.mouse = position;
        }
        let Some(drag) = self.active_for(scene, pointer_id) else {
            return Vec::new();
        };
        self.active = None;
        vec![
            Event::Drop {
                visual: drag.visual,
                zone: scene.drop_zone_at(position),
                pointer: position,
            },
            Event::DragEnd { visual: drag.visual },
        ]
    }

    fn active_for(&mut self, scene: &Scene, pointer_id: PointerId) -> Option<ActiveDrag> {
        let drag = self.active.filter(|drag| drag.pointer_id == pointer_id)?;
        if !scene.contains(drag.visual) {
            log::debug!("dropping drag of destroyed visual {:?}", drag.visual);
            self.active = None;
            return None;
        }
        Some(drag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::geom::Color;

    struct Fixture {
        scene: Scene,
        piece: VisualId,
        zone: VisualId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new(Vec2::new(800.0, 600.0), Assets::new());
        let zone = scene.add_rect(Vec2::new(400.0, 400.0), Vec2::splat(100.0), Color::WHITE, None);
        scene.set_drop_zone(zone, true);
        // 32x32 placeholder image.
        let piece = scene.add_image(Vec2::new(100.0, 100.0), "piece");
        scene.set_draggable(piece, true);
        Fixture { scene, piece, zone }
    }

    #[test]
    fn press_outside_draggables_does_nothing() {
        let f = fixture();
        let mut tracker = DragTracker::new();
        assert!(tracker
            .pointer_pressed(&f.scene, PointerId::Mouse, Vec2::new(300.0, 100.0))
            .is_empty());
        assert!(tracker
            .pointer_moved(&f.scene, PointerId::Mouse, Vec2::new(310.0, 100.0))
            .is_empty());
        assert_eq!(tracker.dragging(), None);
    }

    #[test]
    fn drag_keeps_the_grab_offset() {
        let f = fixture();
        let mut tracker = DragTracker::new();
        let events = tracker.pointer_pressed(&f.scene, PointerId::Mouse, Vec2::new(105.0, 98.0));
        assert_eq!(
            events,
            vec![Event::DragStart {
                visual: f.piece,
                pointer: Vec2::new(105.0, 98.0)
            }]
        );
        let events = tracker.pointer_moved(&f.scene, PointerId::Mouse, Vec2::new(205.0, 148.0));
        assert_eq!(
            events,
            vec![Event::Drag {
                visual: f.piece,
                position: Vec2::new(200.0, 150.0)
            }]
        );
    }

    #[test]
    fn release_over_zone_drops_then_ends() {
        let f = fixture();
        let mut tracker = DragTracker::new();
        tracker.pointer_pressed(&f.scene, PointerId::Mouse, Vec2::new(100.0, 100.0));
        let end = Vec2::new(390.0, 410.0);
        let events = tracker.pointer_released(&f.scene, PointerId::Mouse, end);
        assert_eq!(
            events,
            vec![
                Event::Drop {
                    visual: f.piece,
                    zone: Some(f.zone),
                    pointer: end
                },
                Event::DragEnd { visual: f.piece },
            ]
        );
        assert_eq!(tracker.dragging(), None);
    }

    #[test]
    fn release_elsewhere_drops_without_zone() {
        let f = fixture();
        let mut tracker = DragTracker::new();
        tracker.pointer_pressed(&f.scene, PointerId::Mouse, Vec2::new(100.0, 100.0));
        let events = tracker.pointer_released(&f.scene, PointerId::Mouse, Vec2::new(700.0, 50.0));
        assert!(matches!(events[0], Event::Drop { zone: None, .. }));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn leaving_a_zone_is_reported_once() {
        let f = fixture();
        let mut tracker = DragTracker::new();
        tracker.pointer_pressed(&f.scene, PointerId::Mouse, Vec2::new(100.0, 100.0));
        tracker.pointer_moved(&f.scene, PointerId::Mouse, Vec2::new(400.0, 400.0));
        let events = tracker.pointer_moved(&f.scene, PointerId::Mouse, Vec2::new(600.0, 400.0));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            Event::DragLeave {
                visual: f.piece,
                zone: f.zone
            }
        );
        let events = tracker.pointer_moved(&f.scene, PointerId::Mouse, Vec2::new(650.0, 400.0));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn second_pointer_is_ignored_during_a_drag() {
        let f = fixture();
        let mut tracker = DragTracker::new();
        tracker.pointer_pressed(&f.scene, PointerId::Touch(1), Vec2::new(100.0, 100.0));
        assert!(tracker
            .pointer_pressed(&f.scene, PointerId::Touch(2), Vec2::new(100.0, 100.0))
            .is_empty());
        assert!(tracker
            .pointer_released(&f.scene, PointerId::Touch(2), Vec2::new(100.0, 100.0))
            .is_empty());
        assert_eq!(tracker.dragging(), Some(f.piece));
    }

    #[test]
    fn destroyed_visual_cancels_the_drag() {
        let mut f = fixture();
        let mut tracker = DragTracker::new();
        tracker.pointer_pressed(&f.scene, PointerId::Mouse, Vec2::new(100.0, 100.0));
        f.scene.destroy(f.piece);
        assert!(tracker
            .pointer_released(&f.scene, PointerId::Mouse, Vec2::new(400.0, 400.0))
            .is_empty());
        assert_eq!(tracker.dragging(), None);
    }
}
