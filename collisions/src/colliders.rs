use bevy::prelude::*;
use common::FRect;
use common::Position;

use super::{
    shapes::{ColliderShape, ColliderShapeType},
    ColliderId,
};

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Collider {
    pub id: ColliderId,
    pub entity: Option<Entity>,
    /// True when the owning entity carries a steering agent. The collision
    /// map never rasterizes agent colliders, and obstacle avoidance can be
    /// told to skip them.
    pub is_agent: bool,
    pub shape: ColliderShape,
    pub(crate) is_registered: bool,
}

impl Collider {
    pub fn new(shape_type: ColliderShapeType, entity: Option<Entity>) -> Self {
        let bounds = match shape_type {
            ColliderShapeType::Circle { radius } => {
                FRect::new(0.0, 0.0, radius * 2.0, radius * 2.0)
            }
            ColliderShapeType::Box { width, height } => FRect::new(0.0, 0.0, width, height),
            ColliderShapeType::None => FRect::new(0.0, 0.0, 0.0, 0.0),
        };

        let mut shape = ColliderShape::new(shape_type);
        shape.bounds = bounds;

        Self {
            id: ColliderId(0),
            entity,
            is_agent: false,
            shape,
            is_registered: false,
        }
    }

    /// Center of the collider in world space.
    pub fn position(&self) -> Vec2 {
        self.shape.position
    }

    /// World-space AABB.
    pub fn bounds(&self) -> FRect {
        self.shape.bounds
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.shape.position = position;
        self.recalc_bounds();
    }

    pub fn recalc_bounds(&mut self) {
        match self.shape.shape_type {
            ColliderShapeType::Circle { radius } => {
                self.shape.bounds.x = self.shape.position.x - radius;
                self.shape.bounds.y = self.shape.position.y - radius;
                self.shape.bounds.width = radius * 2.0;
                self.shape.bounds.height = radius * 2.0;
            }
            ColliderShapeType::Box { width, height } => {
                self.shape.bounds.x = self.shape.position.x - width / 2.0;
                self.shape.bounds.y = self.shape.position.y - height / 2.0;
                self.shape.bounds.width = width;
                self.shape.bounds.height = height;
            }
            ColliderShapeType::None => {}
        };
    }

    pub(crate) fn update_from_position(&mut self, position: &Position) {
        if !self.needs_update(position) {
            return;
        }

        self.set_position(position.0);
    }

    fn needs_update(&self, position: &Position) -> bool {
        !self.is_registered || self.shape.position != position.0
    }
}
