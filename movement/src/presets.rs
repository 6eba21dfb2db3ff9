//! Pre-configured steering contexts.
//!
//! Each constructor returns a [`ContextBuilder`] holding a context tuned the
//! way that behavior is usually run; chain setters to override and finish
//! with [`ContextBuilder::build`]:
//!
//! ```
//! use movement::{presets, AgentId};
//!
//! let target = AgentId(7);
//! let ctx = presets::seek(target).radius(500.0).weight(1.5).build();
//! assert_eq!(ctx.identifier, "seek");
//! ```

use crate::behaviors::SteeringBehavior;
use crate::context::SteeringContext;
use crate::AgentId;

pub struct ContextBuilder {
    context: SteeringContext,
}

impl ContextBuilder {
    fn new(behavior: SteeringBehavior) -> Self {
        Self {
            context: SteeringContext::new(behavior),
        }
    }

    pub fn target(mut self, target: AgentId) -> Self {
        self.context.target = Some(target);
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.context.identifier = identifier.into();
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.context.active = active;
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.context.radius = radius;
        self
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.context.weight = weight;
        self
    }

    pub fn view_angle(mut self, degrees: f32) -> Self {
        self.context.view_angle = degrees;
        self
    }

    pub fn separation_radius(mut self, radius: f32) -> Self {
        self.context.separation_radius = radius;
        self
    }

    pub fn alignment_radius(mut self, radius: f32) -> Self {
        self.context.alignment_radius = radius;
        self
    }

    pub fn cohesion_radius(mut self, radius: f32) -> Self {
        self.context.cohesion_radius = radius;
        self
    }

    pub fn slowing_radius(mut self, radius: f32) -> Self {
        self.context.slowing_radius = radius;
        self
    }

    pub fn arrival_tolerance(mut self, tolerance: f32) -> Self {
        self.context.arrival_tolerance = tolerance;
        self
    }

    pub fn wander_radius(mut self, radius: f32) -> Self {
        self.context.wander_radius = radius;
        self
    }

    pub fn wander_distance(mut self, distance: f32) -> Self {
        self.context.wander_distance = distance;
        self
    }

    pub fn wander_jitter(mut self, jitter: f32) -> Self {
        self.context.wander_jitter = jitter;
        self
    }

    pub fn max_prediction(mut self, seconds: f32) -> Self {
        self.context.max_prediction = seconds;
        self
    }

    pub fn avoidance_distance(mut self, distance: f32) -> Self {
        self.context.avoidance_distance = distance;
        self
    }

    pub fn avoidance_force(mut self, force: f32) -> Self {
        self.context.avoidance_force = force;
        self
    }

    pub fn ignore_agents_in_avoidance(mut self, ignore: bool) -> Self {
        self.context.ignore_agents_in_avoidance = ignore;
        self
    }

    pub fn path_radius(mut self, radius: f32) -> Self {
        self.context.path_radius = radius;
        self
    }

    pub fn path_ahead_distance(mut self, distance: f32) -> Self {
        self.context.path_ahead_distance = distance;
        self
    }

    pub fn build(self) -> SteeringContext {
        self.context
    }
}

impl From<ContextBuilder> for SteeringContext {
    fn from(builder: ContextBuilder) -> Self {
        builder.build()
    }
}

/// Chase the target wherever it is; no range limit.
pub fn seek(target: AgentId) -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Seek)
        .target(target)
        .radius(0.0)
}

/// Run from the target; no range limit by default.
pub fn flee(target: AgentId) -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Flee)
        .target(target)
        .radius(0.0)
}

/// Seek that brakes inside 100 units and stops within 5.
pub fn arrival(target: AgentId) -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Arrival)
        .target(target)
        .radius(0.0)
        .slowing_radius(100.0)
        .arrival_tolerance(5.0)
}

/// Lead the target by up to one second of prediction.
pub fn pursuit(target: AgentId) -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Pursuit)
        .target(target)
        .radius(0.0)
        .max_prediction(1.0)
}

/// Dodge the target's predicted position.
pub fn evade(target: AgentId) -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Evade)
        .target(target)
        .radius(0.0)
        .max_prediction(1.0)
}

/// Aimless roaming; `seed` fixes the jitter stream so runs reproduce.
pub fn wander(seed: u64) -> ContextBuilder {
    let mut builder = ContextBuilder::new(SteeringBehavior::Wander)
        .wander_radius(50.0)
        .wander_distance(100.0)
        .wander_jitter(10.0);
    builder.context.reseed_wander(seed);
    builder
}

/// Keep 25 units of personal space from other agents.
pub fn separation() -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Separation).separation_radius(25.0)
}

/// Match headings with agents within 50 units.
pub fn alignment() -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Alignment).alignment_radius(50.0)
}

/// Drift toward the center of agents within 75 units.
pub fn cohesion() -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::Cohesion).cohesion_radius(75.0)
}

/// Swerve around static colliders up to 50 units ahead.
pub fn obstacle_avoidance() -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::ObstacleAvoidance)
        .avoidance_distance(50.0)
        .avoidance_force(1.5)
        .ignore_agents_in_avoidance(true)
}

/// Follow grid-computed waypoints toward the target.
pub fn path_following(target: AgentId) -> ContextBuilder {
    ContextBuilder::new(SteeringBehavior::PathFollowing)
        .target(target)
        .path_radius(10.0)
        .path_ahead_distance(25.0)
}
