use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::behaviors::SteeringBehavior;
use crate::AgentId;

/// Parameter record binding one behavior to one agent.
///
/// Every tunable a behavior reads lives here; behaviors that do not use a
/// given field simply ignore it. The wander jitter state (target point and
/// RNG) is also per-context, so two wanderers never share a random stream.
#[derive(Debug, Clone)]
pub struct SteeringContext {
    pub behavior: SteeringBehavior,
    /// Agent this behavior chases, flees or paths toward. A destroyed or
    /// never-registered target contributes zero force.
    pub target: Option<AgentId>,
    /// Owning agent; assigned when the context is attached.
    pub owner: Option<AgentId>,
    /// Inactive contexts are skipped during force summation.
    pub active: bool,
    pub identifier: String,

    /// Detection/influence radius; 0 means unlimited.
    pub radius: f32,
    /// Scales the final force of this context.
    pub weight: f32,
    /// Field of view in degrees; 360 disables the angular cull.
    pub view_angle: f32,

    // Flocking
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,

    // Arrival
    pub slowing_radius: f32,
    pub arrival_tolerance: f32,

    // Wander
    pub wander_radius: f32,
    pub wander_distance: f32,
    /// Max random displacement of the wander target per tick.
    pub wander_jitter: f32,
    pub(crate) wander_target: Vec2,
    pub(crate) wander_rng: StdRng,

    // Pursuit / evade
    /// Max time to predict a target's position, in seconds.
    pub max_prediction: f32,

    // Obstacle avoidance
    pub avoidance_distance: f32,
    pub avoidance_force: f32,
    pub ignore_agents_in_avoidance: bool,

    // Path following
    /// Waypoint tolerance around the path; reserved for hosts that trim
    /// reached waypoints themselves.
    pub path_radius: f32,
    /// How far ahead of the nearest on-path point to steer for.
    pub path_ahead_distance: f32,
}

impl Default for SteeringContext {
    fn default() -> Self {
        Self {
            behavior: SteeringBehavior::Seek,
            target: None,
            owner: None,
            active: true,
            identifier: String::from("default"),
            radius: 50.0,
            weight: 1.0,
            view_angle: 360.0,
            separation_radius: 25.0,
            alignment_radius: 50.0,
            cohesion_radius: 75.0,
            slowing_radius: 100.0,
            arrival_tolerance: 5.0,
            wander_radius: 50.0,
            wander_distance: 100.0,
            wander_jitter: 10.0,
            wander_target: Vec2::X,
            wander_rng: StdRng::seed_from_u64(0),
            max_prediction: 1.0,
            avoidance_distance: 50.0,
            avoidance_force: 1.5,
            ignore_agents_in_avoidance: true,
            path_radius: 10.0,
            path_ahead_distance: 25.0,
        }
    }
}

impl SteeringContext {
    pub fn new(behavior: SteeringBehavior) -> Self {
        Self {
            behavior,
            identifier: String::from(behavior.name()),
            ..Default::default()
        }
    }

    /// Re-seeds the wander stream and picks a fresh starting point on the
    /// wander circle. Two contexts seeded alike wander identically.
    pub fn reseed_wander(&mut self, seed: u64) {
        self.wander_rng = StdRng::seed_from_u64(seed);
        let angle = self.wander_rng.gen_range(0.0..std::f32::consts::TAU);
        self.wander_target = Vec2::new(angle.cos(), angle.sin());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_names_the_context_after_its_behavior() {
        let ctx = SteeringContext::new(SteeringBehavior::Cohesion);
        assert_eq!(ctx.identifier, "cohesion");
        assert!(ctx.active);
        assert_eq!(ctx.weight, 1.0);
        assert_eq!(ctx.view_angle, 360.0);
    }

    #[test]
    fn reseeded_wander_streams_match() {
        let mut a = SteeringContext::new(SteeringBehavior::Wander);
        let mut b = SteeringContext::new(SteeringBehavior::Wander);
        a.reseed_wander(7);
        b.reseed_wander(7);

        assert_eq!(a.wander_target, b.wander_target);
        let ja: f32 = a.wander_rng.gen_range(-1.0..=1.0);
        let jb: f32 = b.wander_rng.gen_range(-1.0..=1.0);
        assert_eq!(ja, jb);
    }
}
