use bevy::{prelude::*, utils::HashMap};
use collisions::prelude::*;
use common::math::truncate_vec2;
use nav::prelude::CollisionMap;

use crate::agent::Agent;
use crate::behaviors::SteeringBehavior;
use crate::context::SteeringContext;
use crate::AgentId;

/// Linear velocity damping factor applied every tick.
const DRAG: f32 = 2.0;

/// Everything a behavior may reach during execution: the agent registry,
/// the scene's colliders and the pathfinding map. Handed to each context by
/// the tick instead of behaviors reaching for global state.
pub struct SteeringEnv<'a> {
    pub agents: &'a AgentSystem,
    pub colliders: &'a ColliderStore,
    pub map: &'a mut CollisionMap,
}

/// Fired the tick an agent leaves the pending buffer and joins the registry.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentStarted(pub AgentId);

/// Fired when a removal is drained (or on shutdown).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDestroyed(pub AgentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentLifecycle {
    Started(AgentId),
    Destroyed(AgentId),
}

/// Registry of steering agents and the per-frame tick dispatch.
///
/// Registration and removal are buffered: the registry only changes at the
/// boundaries of [`AgentSystem::tick`], so behaviors iterating the agent list
/// never observe a mutation mid-frame. Agents tick in registration order.
#[derive(Resource, Default)]
pub struct AgentSystem {
    agents: HashMap<AgentId, Agent>,
    order: Vec<AgentId>,
    pending_add: Vec<Agent>,
    pending_remove: Vec<AgentId>,
    behaviors: HashMap<String, SteeringBehavior>,
    pending_behaviors: Vec<(String, SteeringBehavior)>,
    lifecycle: Vec<AgentLifecycle>,
    next_id: u32,
}

impl AgentSystem {
    /// Queues an agent for registration and hands back its id immediately.
    /// The agent joins the registry (and fires [`AgentStarted`]) at the top
    /// of the next tick.
    pub fn register(&mut self, mut agent: Agent) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        agent.assign_id(id);
        self.pending_add.push(agent);
        id
    }

    /// Queues an agent for removal; it keeps ticking until the removal is
    /// drained at the end of the current tick.
    pub fn unregister(&mut self, id: AgentId) {
        self.pending_remove.push(id);
    }

    /// Resolves an id, including agents still waiting in the add buffer.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents
            .get(&id)
            .or_else(|| self.pending_add.iter().find(|a| a.id() == id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        if self.agents.contains_key(&id) {
            return self.agents.get_mut(&id);
        }
        self.pending_add.iter_mut().find(|a| a.id() == id)
    }

    /// Registered agents in registration order. Pending agents are excluded
    /// until their add is drained.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.order.iter().filter_map(|id| self.agents.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Attaches a context to an agent, recording the behavior's name in the
    /// diagnostics registry along the way.
    pub fn attach_context(&mut self, id: AgentId, context: SteeringContext) {
        self.pending_behaviors
            .push((context.behavior.name().to_string(), context.behavior));

        if let Some(agent) = self.agent_mut(id) {
            agent.add_context(context);
        }
    }

    /// Name-keyed registry of every behavior kind seen so far.
    pub fn behaviors(&self) -> &HashMap<String, SteeringBehavior> {
        &self.behaviors
    }

    /// Lifecycle notifications accumulated since the last drain.
    pub fn drain_lifecycle(&mut self) -> Vec<AgentLifecycle> {
        std::mem::take(&mut self.lifecycle)
    }

    /// Advances every agent by `dt` seconds.
    ///
    /// Order is fixed: drain pending registrations (firing start events),
    /// tick active agents in registration order, drain pending removals
    /// (firing destroy events), then fold new behavior names into the
    /// registry (first name wins).
    pub fn tick(&mut self, dt: f32, colliders: &ColliderStore, map: &mut CollisionMap) {
        let added = std::mem::take(&mut self.pending_add);
        for agent in added {
            let id = agent.id();
            self.order.push(id);
            self.agents.insert(id, agent);
            self.lifecycle.push(AgentLifecycle::Started(id));
        }

        let ids = self.order.clone();
        for id in ids {
            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            if !agent.active {
                continue;
            }

            agent.drain_context_buffers();

            // Contexts leave the agent for the duration of the summation so
            // behaviors can read the whole registry (self included) while
            // wander mutates its per-context state.
            let mut contexts = std::mem::take(&mut agent.contexts);

            let mut steering = Vec2::ZERO;
            {
                let mut env = SteeringEnv {
                    agents: &*self,
                    colliders,
                    map: &mut *map,
                };
                for context in contexts.iter_mut() {
                    if !context.active {
                        continue;
                    }
                    steering += context.execute(id, &mut env);
                }
            }

            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            agent.contexts = contexts;

            let steering = truncate_vec2(steering, agent.max_force);
            agent.last_desired_velocity = steering;

            agent.body.velocity += steering * dt;
            agent.body.velocity *= (1.0 - DRAG * dt).max(0.0);
            let velocity = agent.body.velocity;
            agent.body.position += velocity * dt;
        }

        let removals = std::mem::take(&mut self.pending_remove);
        for id in removals {
            if self.agents.remove(&id).is_some() {
                self.order.retain(|other| *other != id);
                self.lifecycle.push(AgentLifecycle::Destroyed(id));
            }
        }

        let pending = std::mem::take(&mut self.pending_behaviors);
        for (name, behavior) in pending {
            self.behaviors.entry(name).or_insert(behavior);
        }
    }

    /// Destroys every agent and clears all buffers.
    pub fn shutdown(&mut self) {
        let order = std::mem::take(&mut self.order);
        for id in order {
            self.lifecycle.push(AgentLifecycle::Destroyed(id));
        }

        self.agents.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
    }
}
