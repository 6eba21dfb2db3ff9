use bevy::prelude::*;
use collisions::prelude::*;
use common::Position;
use nav::prelude::CollisionMap;

use crate::system::{AgentDestroyed, AgentLifecycle, AgentStarted, AgentSystem};
use crate::AgentId;

/// ECS-side handle tying an entity to an agent in the [`AgentSystem`]. The
/// sync system mirrors the agent body onto the entity's `Transform` and
/// `Position` once per frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect, Hash)]
pub struct AgentComponent {
    pub id: AgentId,
}

pub struct SteeringPlugin;

impl Plugin for SteeringPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentSystem>()
            .add_event::<AgentStarted>()
            .add_event::<AgentDestroyed>()
            .add_systems(
                Update,
                (tick_agents, forward_lifecycle, sync_agent_transforms).chain(),
            );
    }
}

fn tick_agents(
    time: Res<Time>,
    mut system: ResMut<AgentSystem>,
    mut colliders: ResMut<ColliderStore>,
    mut map: ResMut<CollisionMap>,
) {
    // Keep agent-owned colliders flagged so the rasterizer and obstacle
    // avoidance can tell bodies from obstacles.
    let owned: Vec<_> = system.iter().filter_map(|agent| agent.collider).collect();
    for id in owned {
        colliders.mark_agent(id, true);
    }

    system.tick(time.delta_seconds(), &colliders, &mut map);
}

fn forward_lifecycle(
    mut system: ResMut<AgentSystem>,
    mut started: EventWriter<AgentStarted>,
    mut destroyed: EventWriter<AgentDestroyed>,
) {
    for event in system.drain_lifecycle() {
        match event {
            AgentLifecycle::Started(id) => {
                started.send(AgentStarted(id));
            }
            AgentLifecycle::Destroyed(id) => {
                destroyed.send(AgentDestroyed(id));
            }
        }
    }
}

fn sync_agent_transforms(
    system: Res<AgentSystem>,
    mut targets: Query<(&mut Transform, Option<&mut Position>), With<AgentComponent>>,
) {
    for agent in system.iter() {
        let Some(entity) = agent.entity else {
            continue;
        };
        let Ok((mut transform, position)) = targets.get_mut(entity) else {
            continue;
        };

        transform.translation = agent.body.position.extend(transform.translation.z);
        if let Some(mut position) = position {
            position.0 = agent.body.position;
        }
    }
}
