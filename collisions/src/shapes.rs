use bevy::{math::Vec2, prelude::default, reflect::Reflect};
use common::FRect;

/// The geometric variants the movement core understands. Adding a shape means
/// adding a variant here and teaching the rasterizer and avoidance about it.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ColliderShapeType {
    None,
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ColliderShape {
    pub shape_type: ColliderShapeType,
    pub(crate) position: Vec2,
    pub(crate) bounds: FRect,
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self {
            shape_type: ColliderShapeType::None,
            position: Vec2::ZERO,
            bounds: FRect::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

impl ColliderShape {
    pub fn new(shape_type: ColliderShapeType) -> Self {
        Self {
            shape_type,
            ..default()
        }
    }

    /// Shorter side of the shape's AABB. The collision map uses the smallest
    /// of these across the scene as its tile size.
    pub fn min_extent(&self) -> f32 {
        match self.shape_type {
            ColliderShapeType::Circle { radius } => radius * 2.0,
            ColliderShapeType::Box { width, height } => width.min(height),
            ColliderShapeType::None => 0.0,
        }
    }

    /// Conservative circular radius covering the whole shape: circles use
    /// their radius, boxes half their diagonal.
    pub fn approx_radius(&self) -> f32 {
        match self.shape_type {
            ColliderShapeType::Circle { radius } => radius,
            ColliderShapeType::Box { width, height } => (width * width + height * height).sqrt() * 0.5,
            ColliderShapeType::None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_extent_picks_shorter_side() {
        let bx = ColliderShape::new(ColliderShapeType::Box {
            width: 30.0,
            height: 20.0,
        });
        assert_eq!(bx.min_extent(), 20.0);

        let circle = ColliderShape::new(ColliderShapeType::Circle { radius: 8.0 });
        assert_eq!(circle.min_extent(), 16.0);
    }

    #[test]
    fn approx_radius_covers_box_diagonal() {
        let bx = ColliderShape::new(ColliderShapeType::Box {
            width: 6.0,
            height: 8.0,
        });
        assert!((bx.approx_radius() - 5.0).abs() < 1e-6);
    }
}
