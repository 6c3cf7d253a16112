use std::f32::consts::{PI, TAU};

use glam::Vec2;
use image::{Rgba, RgbaImage};

/// The five shapes a round is built from, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Rectangle,
    Pentagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Rectangle,
        ShapeKind::Pentagon,
    ];

    /// Position in [`ShapeKind::ALL`]; shapes and targets are matched on this.
    pub fn id(self) -> usize {
        self as usize
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    /// Display name, also used as the texture key.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Pentagon => "pentagon",
        }
    }

    fn color(self) -> Rgba<u8> {
        match self {
            ShapeKind::Circle => Rgba([0xe5, 0x39, 0x35, 0xff]),
            ShapeKind::Square => Rgba([0x1e, 0x88, 0xe5, 0xff]),
            ShapeKind::Triangle => Rgba([0x43, 0xa0, 0x47, 0xff]),
            ShapeKind::Rectangle => Rgba([0xfb, 0x8c, 0x00, 0xff]),
            ShapeKind::Pentagon => Rgba([0x8e, 0x24, 0xaa, 0xff]),
        }
    }

    /// Whether a point in unit space (`-1..=1` on both axes, y down) is inside the shape.
    fn covers(self, p: Vec2) -> bool {
        match self {
            ShapeKind::Circle => p.length_squared() <= 0.9 * 0.9,
            ShapeKind::Square => p.x.abs() <= 0.8 && p.y.abs() <= 0.8,
            ShapeKind::Rectangle => p.x.abs() <= 0.9 && p.y.abs() <= 0.5,
            ShapeKind::Triangle => {
                let corners = [Vec2::new(0.0, -0.85), Vec2::new(0.9, 0.75), Vec2::new(-0.9, 0.75)];
                inside_convex(&corners, p)
            }
            ShapeKind::Pentagon => {
                let corners: Vec<Vec2> = (0..5)
                    .map(|i| {
                        let angle = -PI / 2.0 + i as f32 * TAU / 5.0;
                        Vec2::new(angle.cos(), angle.sin()) * 0.9
                    })
                    .collect();
                inside_convex(&corners, p)
            }
        }
    }

    /// Flat-colored stand-in texture used when the image asset is unavailable.
    pub fn rasterize(self, size: u32) -> RgbaImage {
        let color = self.color();
        let half = size as f32 / 2.0;
        RgbaImage::from_fn(size, size, |x, y| {
            let p = Vec2::new((x as f32 + 0.5 - half) / half, (y as f32 + 0.5 - half) / half);
            if self.covers(p) {
                color
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }
}

/// Corners must be listed clockwise on screen (y down).
fn inside_convex(corners: &[Vec2], p: Vec2) -> bool {
    corners.iter().zip(corners.iter().cycle().skip(1)).all(|(a, b)| {
        let edge = *b - *a;
        edge.perp_dot(p - *a) >= 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_canonical_order() {
        for (index, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.id(), index);
            assert_eq!(ShapeKind::from_id(index), Some(*kind));
        }
        assert_eq!(ShapeKind::from_id(5), None);
        let names: Vec<_> = ShapeKind::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(names, ["circle", "square", "triangle", "rectangle", "pentagon"]);
    }

    #[test]
    fn rasterized_shapes_fill_their_centre_but_not_corners() {
        for kind in ShapeKind::ALL {
            let image = kind.rasterize(64);
            assert_eq!(image.dimensions(), (64, 64));
            assert_eq!(image.get_pixel(32, 40)[3], 255, "{kind:?} centre");
            assert_eq!(image.get_pixel(0, 0)[3], 0, "{kind:?} corner");
            assert_eq!(image.get_pixel(63, 0)[3], 0, "{kind:?} corner");
        }
    }

    #[test]
    fn rectangle_is_wider_than_tall() {
        let image = ShapeKind::Rectangle.rasterize(100);
        assert_eq!(image.get_pixel(5, 50)[3], 255);
        assert_eq!(image.get_pixel(50, 10)[3], 0);
    }
}
