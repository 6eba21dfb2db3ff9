use super::{shapes::ColliderShapeType, store::ColliderStore, ColliderId};
use bevy::prelude::*;
use common::Position;

/// ECS-side handle to a collider living in the [`ColliderStore`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect, Hash)]
pub struct ColliderComponent {
    pub id: ColliderId,
}

impl From<ColliderComponent> for ColliderId {
    fn from(value: ColliderComponent) -> Self {
        value.id
    }
}

impl ColliderComponent {
    pub fn new(collider_store: &mut ColliderStore, shape_type: ColliderShapeType) -> Self {
        collider_store.create_and_register(shape_type, None)
    }
}

#[derive(Bundle)]
pub struct ColliderBundle {
    pub collider: ColliderComponent,
    pub position: Position,
}

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ColliderStore>().add_systems(
            Update,
            (update_positions, on_collider_added, on_collider_removed),
        );
    }
}

fn update_positions(
    mut collider_store: ResMut<ColliderStore>,
    colliders: Query<(&ColliderComponent, &Position), Changed<Position>>,
) {
    for (collider, position) in &colliders {
        collider_store.update_single(collider.id, position);
    }
}

fn on_collider_added(
    mut collider_store: ResMut<ColliderStore>,
    colliders: Query<(Entity, &ColliderComponent, &Position), Added<ColliderComponent>>,
) {
    for (entity, col, position) in &colliders {
        collider_store.added_with_position(col.id, position);
        collider_store.set_entity(col.id, entity);
    }
}

fn on_collider_removed(
    mut removed: RemovedComponents<ColliderComponent>,
    mut collider_store: ResMut<ColliderStore>,
    query: Query<&ColliderComponent>,
) {
    for entity in removed.read() {
        if let Ok(collider_id) = query.get(entity) {
            collider_store.remove(*collider_id);
        }
    }
}
