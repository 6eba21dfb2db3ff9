use bevy::{prelude::*, utils::HashMap};
use std::sync::atomic::{AtomicU32, Ordering};

use common::Position;

use super::{
    colliders::Collider, plugin::ColliderComponent, shapes::ColliderShapeType, ColliderId,
};

pub trait ColliderIdResolver {
    fn get(&self, id: impl Into<ColliderId>) -> Option<&Collider>;
    fn get_mut(&mut self, id: impl Into<ColliderId>) -> Option<&mut Collider>;
}

static COLLIDER_ID_GEN: AtomicU32 = AtomicU32::new(0);

/// Registry of every collider in the scene.
///
/// Iteration follows registration order, which keeps consumers (rasterizer,
/// obstacle avoidance) deterministic from frame to frame.
#[derive(Resource, Default)]
pub struct ColliderStore {
    colliders: HashMap<ColliderId, Collider>,
    order: Vec<ColliderId>,
}

impl ColliderStore {
    pub fn create_and_register(
        &mut self,
        shape_type: ColliderShapeType,
        initial_pos: Option<Vec2>,
    ) -> ColliderComponent {
        let collider = Collider::new(shape_type, None);

        let id = self.register(collider);

        if let Some(pos) = initial_pos {
            self.added_with_position(id, &Position(pos));
        }

        ColliderComponent { id }
    }

    pub fn register(&mut self, mut collider: Collider) -> ColliderId {
        let id = COLLIDER_ID_GEN.fetch_add(1, Ordering::SeqCst);
        let id = ColliderId(id);
        collider.id = id;

        self.colliders.insert(id, collider);
        self.order.push(id);

        id
    }

    pub fn remove(&mut self, id: impl Into<ColliderId>) -> Option<Collider> {
        let id = id.into();
        let col = self.colliders.get_mut(&id);
        col.as_ref()?;

        let col: &mut Collider = col.unwrap();
        col.is_registered = false;

        self.order.retain(|other| *other != id);
        self.colliders.remove(&id)
    }

    /// Colliders in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.order.iter().filter_map(|id| self.colliders.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn debug_draw(&self, gizmos: &mut Gizmos) {
        for collider in self.iter() {
            let pos = collider.position();
            match collider.shape.shape_type {
                ColliderShapeType::Circle { radius } => {
                    gizmos.circle_2d(pos, radius, Color::srgba(1.0, 0., 0., 1.0));
                }
                ColliderShapeType::Box { width, height } => gizmos.rect_2d(
                    pos,
                    0.,
                    Vec2::new(width, height),
                    Color::srgba(1.0, 0., 0., 1.0),
                ),
                ColliderShapeType::None => {}
            }
        }
    }

    pub(crate) fn update_single(&mut self, id: ColliderId, position: &Position) {
        if let Some(col) = self.get_mut(id) {
            col.is_registered = true;
            col.update_from_position(position);
        }
    }

    pub(crate) fn added_with_position(&mut self, id: ColliderId, position: &Position) {
        self.update_single(id, position);
    }

    pub(crate) fn set_entity(&mut self, id: ColliderId, entity: Entity) {
        if let Some(col) = self.get_mut(id) {
            col.entity = Some(entity);
        }
    }

    /// Flags the collider as belonging to a steering agent. Called by the
    /// steering plugin when an agent claims a collider as its own body.
    pub fn mark_agent(&mut self, id: ColliderId, is_agent: bool) {
        if let Some(col) = self.get_mut(id) {
            col.is_agent = is_agent;
        }
    }
}

impl ColliderIdResolver for ColliderStore {
    fn get(&self, id: impl Into<ColliderId>) -> Option<&Collider> {
        self.colliders.get(&id.into())
    }

    fn get_mut(&mut self, id: impl Into<ColliderId>) -> Option<&mut Collider> {
        self.colliders.get_mut(&id.into())
    }
}
