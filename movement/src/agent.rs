use bevy::prelude::*;
use collisions::ColliderId;

use crate::context::SteeringContext;
use crate::AgentId;

/// Kinematic state owned by the agent and integrated by its tick.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AgentBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing used when the agent is (almost) standing still.
    pub heading: Vec2,
}

impl Default for AgentBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            heading: Vec2::X,
        }
    }
}

impl AgentBody {
    /// Direction the agent is considered to face: the velocity direction, or
    /// the stored heading when velocity is below the standstill threshold.
    pub fn forward(&self) -> Vec2 {
        if self.velocity.length() > 1e-2 {
            self.velocity.normalize_or_zero()
        } else {
            self.heading
        }
    }
}

/// One steering agent: kinematics, tuning and its attached behavior contexts.
///
/// Context attach/detach is buffered; the active list only changes at the
/// start of the agent's own tick, never while forces are being summed.
#[derive(Debug)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub body: AgentBody,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Maximum steering force that can be applied to the agent per tick.
    pub max_force: f32,
    /// Clamped steering sum applied on the last tick.
    pub last_desired_velocity: Vec2,
    /// Inactive agents are skipped by the system tick.
    pub active: bool,
    /// Entity whose `Transform`/`Position` mirrors this agent, if any.
    pub entity: Option<Entity>,
    /// The agent's own collider; obstacle avoidance never treats it as an
    /// obstacle and it supplies the avoidance safety margin.
    pub collider: Option<ColliderId>,
    pub(crate) contexts: Vec<SteeringContext>,
    pending_add: Vec<SteeringContext>,
    pending_remove: Vec<String>,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            id: AgentId::default(),
            body: AgentBody::default(),
            speed: 200.0,
            max_force: 1000.0,
            last_desired_velocity: Vec2::ZERO,
            active: true,
            entity: None,
            collider: None,
            contexts: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
        }
    }
}

impl Agent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Vec2) -> Self {
        let mut agent = Self::new();
        agent.body.position = position;
        agent
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Queues a context for attachment; it joins the active list at the top
    /// of the next tick.
    pub fn add_context(&mut self, mut context: SteeringContext) {
        context.owner = Some(self.id);
        self.pending_add.push(context);
    }

    /// Queues removal of the first attached context with this identifier. A
    /// context removed mid-tick still contributes for the rest of that tick.
    pub fn remove_context(&mut self, identifier: &str) {
        self.pending_remove.push(identifier.to_string());
    }

    pub fn get_context(&self, identifier: &str) -> Option<&SteeringContext> {
        self.contexts.iter().find(|c| c.identifier == identifier)
    }

    pub fn get_context_mut(&mut self, identifier: &str) -> Option<&mut SteeringContext> {
        self.contexts.iter_mut().find(|c| c.identifier == identifier)
    }

    /// Currently attached contexts, in attachment order.
    pub fn contexts(&self) -> &[SteeringContext] {
        &self.contexts
    }

    pub(crate) fn assign_id(&mut self, id: AgentId) {
        self.id = id;
        for context in self.contexts.iter_mut().chain(self.pending_add.iter_mut()) {
            context.owner = Some(id);
        }
    }

    pub(crate) fn drain_context_buffers(&mut self) {
        self.contexts.append(&mut self.pending_add);

        for identifier in self.pending_remove.drain(..) {
            if let Some(index) = self
                .contexts
                .iter()
                .position(|c| c.identifier == identifier)
            {
                self.contexts.remove(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::SteeringBehavior;

    #[test]
    fn forward_falls_back_to_heading_when_still() {
        let mut body = AgentBody::default();
        assert_eq!(body.forward(), Vec2::X);

        body.velocity = Vec2::new(0.0, 5.0);
        assert_eq!(body.forward(), Vec2::Y);

        body.velocity = Vec2::new(0.0, 0.005);
        assert_eq!(body.forward(), Vec2::X);
    }

    #[test]
    fn context_changes_are_deferred_until_drain() {
        let mut agent = Agent::new();
        agent.add_context(SteeringContext::new(SteeringBehavior::Seek));

        assert!(agent.get_context("seek").is_none());

        agent.drain_context_buffers();
        assert!(agent.get_context("seek").is_some());

        agent.remove_context("seek");
        assert!(agent.get_context("seek").is_some());

        agent.drain_context_buffers();
        assert!(agent.get_context("seek").is_none());
    }

    #[test]
    fn remove_takes_the_first_match_only() {
        let mut agent = Agent::new();
        agent.add_context(SteeringContext::new(SteeringBehavior::Wander));
        agent.add_context(SteeringContext::new(SteeringBehavior::Wander));
        agent.drain_context_buffers();

        agent.remove_context("wander");
        agent.drain_context_buffers();

        assert_eq!(agent.contexts().len(), 1);
    }
}
