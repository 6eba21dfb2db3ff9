//! The steering force functions.
//!
//! Each behavior maps a [`SteeringContext`] to a force via the shared
//! steer-to-velocity pattern: compute a desired velocity, subtract the
//! current one, scale by the context weight. Missing references (dead
//! target, unknown owner) always yield zero force so the remaining contexts
//! still steer the agent.

use bevy::prelude::*;
use rand::Rng;

use crate::context::SteeringContext;
use crate::system::SteeringEnv;
use crate::AgentId;

/// Velocities below this are treated as standing still when deriving a
/// facing direction.
const STANDSTILL: f32 = 1e-2;

/// Distance under which evade starts panicking (urgency scaling).
const EVADE_PANIC_DISTANCE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SteeringBehavior {
    /// Move straight toward the target.
    Seek,
    /// Move straight away from the target.
    Flee,
    /// Seek that decelerates inside a slowing radius and stops at tolerance.
    Arrival,
    /// Seek the target's predicted interception point.
    Pursuit,
    /// Flee the target's predicted interception point.
    Evade,
    /// Jittered roaming along a projected circle.
    Wander,
    /// Keep personal space from nearby agents.
    Separation,
    /// Match the average heading of nearby agents.
    Alignment,
    /// Drift toward the center of mass of nearby agents.
    Cohesion,
    /// Steer laterally around colliders crossing the movement ray.
    ObstacleAvoidance,
    /// Follow grid-computed waypoints toward the target.
    PathFollowing,
}

impl SteeringBehavior {
    pub fn name(&self) -> &'static str {
        match self {
            SteeringBehavior::Seek => "seek",
            SteeringBehavior::Flee => "flee",
            SteeringBehavior::Arrival => "arrival",
            SteeringBehavior::Pursuit => "pursuit",
            SteeringBehavior::Evade => "evade",
            SteeringBehavior::Wander => "wander",
            SteeringBehavior::Separation => "separation",
            SteeringBehavior::Alignment => "alignment",
            SteeringBehavior::Cohesion => "cohesion",
            SteeringBehavior::ObstacleAvoidance => "obstacle_avoidance",
            SteeringBehavior::PathFollowing => "path_following",
        }
    }
}

impl SteeringContext {
    /// Computes this context's steering force for the owning agent.
    pub fn execute(&mut self, self_id: AgentId, env: &mut SteeringEnv) -> Vec2 {
        match self.behavior {
            SteeringBehavior::Seek => self.seek(self_id, env),
            SteeringBehavior::Flee => self.flee(self_id, env),
            SteeringBehavior::Arrival => self.arrival(self_id, env),
            SteeringBehavior::Pursuit => self.pursuit(self_id, env),
            SteeringBehavior::Evade => self.evade(self_id, env),
            SteeringBehavior::Wander => self.wander(self_id, env),
            SteeringBehavior::Separation => self.separation(self_id, env),
            SteeringBehavior::Alignment => self.alignment(self_id, env),
            SteeringBehavior::Cohesion => self.cohesion(self_id, env),
            SteeringBehavior::ObstacleAvoidance => self.obstacle_avoidance(self_id, env),
            SteeringBehavior::PathFollowing => self.path_following(self_id, env),
        }
    }

    /// Radius guard: with a positive radius, targets beyond it are ignored.
    fn radius_blocked(&self, distance: f32) -> bool {
        self.radius > 0.0 && distance > self.radius
    }

    /// View-angle guard: with a view under 360 degrees, directions more than
    /// half the view away from `forward` are ignored.
    fn outside_view(&self, direction: Vec2, forward: Vec2) -> bool {
        if self.view_angle >= 360.0 {
            return false;
        }

        let cos = direction
            .normalize_or_zero()
            .dot(forward)
            .clamp(-1.0, 1.0);
        let angle = cos.acos().to_degrees();
        angle > self.view_angle / 2.0
    }

    fn seek(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let (Some(agent), Some(target)) = (
            env.agents.get(self_id),
            self.target.and_then(|t| env.agents.get(t)),
        ) else {
            return Vec2::ZERO;
        };

        let direction = target.body.position - agent.body.position;
        let distance = direction.length();

        if self.radius_blocked(distance) {
            return Vec2::ZERO;
        }
        if self.outside_view(direction, agent.body.forward()) {
            return Vec2::ZERO;
        }

        let desired = direction.normalize_or_zero() * agent.speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn flee(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let (Some(agent), Some(target)) = (
            env.agents.get(self_id),
            self.target.and_then(|t| env.agents.get(t)),
        ) else {
            return Vec2::ZERO;
        };

        let direction = agent.body.position - target.body.position;
        let distance = direction.length();

        // Only flee while the threat is within the radius (0 = always flee).
        if self.radius_blocked(distance) {
            return Vec2::ZERO;
        }

        let threat_direction = target.body.position - agent.body.position;
        if self.outside_view(threat_direction, agent.body.forward()) {
            return Vec2::ZERO;
        }

        let desired = direction.normalize_or_zero() * agent.speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn arrival(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let (Some(agent), Some(target)) = (
            env.agents.get(self_id),
            self.target.and_then(|t| env.agents.get(t)),
        ) else {
            return Vec2::ZERO;
        };

        let direction = target.body.position - agent.body.position;
        let distance = direction.length();

        if distance < self.arrival_tolerance {
            return Vec2::ZERO;
        }
        if self.radius_blocked(distance) {
            return Vec2::ZERO;
        }
        if self.outside_view(direction, agent.body.forward()) {
            return Vec2::ZERO;
        }

        let desired_speed = if distance < self.slowing_radius {
            agent.speed * (distance / self.slowing_radius)
        } else {
            agent.speed
        };

        let desired = direction.normalize_or_zero() * desired_speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn pursuit(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let (Some(agent), Some(target)) = (
            env.agents.get(self_id),
            self.target.and_then(|t| env.agents.get(t)),
        ) else {
            return Vec2::ZERO;
        };

        let to_target = target.body.position - agent.body.position;
        let distance = to_target.length();

        if self.radius_blocked(distance) {
            return Vec2::ZERO;
        }
        if self.outside_view(to_target, agent.body.forward()) {
            return Vec2::ZERO;
        }

        let target_velocity = target.body.velocity;
        let self_velocity = agent.body.velocity;
        let relative_velocity = target_velocity - self_velocity;
        let target_speed = target_velocity.length();
        let self_speed = agent.speed;

        let relative_heading = to_target
            .normalize_or_zero()
            .dot(target_velocity.normalize_or_zero());

        let mut prediction_time = if relative_heading > 0.95 {
            // Target is running away along our own line; a closing-speed
            // estimate is good enough.
            distance / (self_speed + target_speed)
        } else {
            intercept_time(to_target, relative_velocity, self_speed, distance)
        };

        prediction_time = prediction_time.min(self.max_prediction);

        let predicted = if prediction_time < 0.1 {
            target.body.position
        } else {
            target.body.position + target_velocity * prediction_time
        };

        let desired = (predicted - agent.body.position).normalize_or_zero() * self_speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn evade(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let (Some(agent), Some(target)) = (
            env.agents.get(self_id),
            self.target.and_then(|t| env.agents.get(t)),
        ) else {
            return Vec2::ZERO;
        };

        let to_target = target.body.position - agent.body.position;
        let distance = to_target.length();

        if self.radius_blocked(distance) {
            return Vec2::ZERO;
        }
        if self.outside_view(to_target, agent.body.forward()) {
            return Vec2::ZERO;
        }

        let target_velocity = target.body.velocity;
        let self_velocity = agent.body.velocity;
        // From the threat's perspective.
        let relative_velocity = self_velocity - target_velocity;
        let target_speed = target_velocity.length();
        let self_speed = agent.speed;

        let relative_heading = to_target
            .normalize_or_zero()
            .dot(target_velocity.normalize_or_zero());

        let mut prediction_time = if relative_heading < -0.95 {
            // The threat is directly behind and closing; keep it short.
            distance / (self_speed + target_speed)
        } else {
            intercept_time(-to_target, relative_velocity, target_speed, distance)
        };

        prediction_time = prediction_time.min(self.max_prediction);

        let predicted = if prediction_time < 0.1 {
            target.body.position
        } else {
            target.body.position + target_velocity * prediction_time
        };

        let away = agent.body.position - predicted;

        // Extra urgency when the threat is on top of us.
        let urgency = if distance < EVADE_PANIC_DISTANCE {
            2.0 - distance / EVADE_PANIC_DISTANCE
        } else {
            1.0
        };

        let desired = away.normalize_or_zero() * self_speed * urgency;
        (desired - agent.body.velocity) * self.weight
    }

    fn wander(&mut self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let Some(agent) = env.agents.get(self_id) else {
            return Vec2::ZERO;
        };

        let jitter = self.wander_jitter;
        let jitter_x = self.wander_rng.gen_range(-jitter..=jitter);
        let jitter_y = self.wander_rng.gen_range(-jitter..=jitter);
        self.wander_target += Vec2::new(jitter_x, jitter_y);
        self.wander_target = self.wander_target.normalize_or_zero() * self.wander_radius;

        let circle_center = agent.body.forward() * self.wander_distance;
        let target_local = circle_center + self.wander_target;

        let desired = target_local.normalize_or_zero() * agent.speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn separation(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let Some(agent) = env.agents.get(self_id) else {
            return Vec2::ZERO;
        };
        let position = agent.body.position;

        let mut force = Vec2::ZERO;
        let mut neighbors = 0;

        for other in env.agents.iter() {
            if other.id() == self_id {
                continue;
            }

            let distance = position.distance(other.body.position);
            if distance > 0.0 && distance < self.separation_radius {
                // The closer the neighbor, the stronger the repulsion.
                let away = (position - other.body.position).normalize_or_zero();
                force += away / distance;
                neighbors += 1;
            }
        }

        if neighbors > 0 {
            force /= neighbors as f32;
            force = force.normalize_or_zero() * agent.speed;
            force -= agent.body.velocity;
        }

        force * self.weight
    }

    fn alignment(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let Some(agent) = env.agents.get(self_id) else {
            return Vec2::ZERO;
        };
        let position = agent.body.position;

        let mut average_velocity = Vec2::ZERO;
        let mut neighbors = 0;

        for other in env.agents.iter() {
            if other.id() == self_id {
                continue;
            }

            let distance = position.distance(other.body.position);
            if distance > 0.0 && distance < self.alignment_radius {
                average_velocity += other.body.velocity;
                neighbors += 1;
            }
        }

        if neighbors == 0 {
            return Vec2::ZERO;
        }

        average_velocity /= neighbors as f32;
        let desired = average_velocity.normalize_or_zero() * agent.speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn cohesion(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let Some(agent) = env.agents.get(self_id) else {
            return Vec2::ZERO;
        };
        let position = agent.body.position;

        let mut center_of_mass = Vec2::ZERO;
        let mut neighbors = 0;

        for other in env.agents.iter() {
            if other.id() == self_id {
                continue;
            }

            let distance = position.distance(other.body.position);
            if distance > 0.0 && distance < self.cohesion_radius {
                center_of_mass += other.body.position;
                neighbors += 1;
            }
        }

        if neighbors == 0 {
            return Vec2::ZERO;
        }

        center_of_mass /= neighbors as f32;
        let desired = (center_of_mass - position).normalize_or_zero() * agent.speed;
        (desired - agent.body.velocity) * self.weight
    }

    fn obstacle_avoidance(&self, self_id: AgentId, env: &SteeringEnv) -> Vec2 {
        let Some(agent) = env.agents.get(self_id) else {
            return Vec2::ZERO;
        };

        let position = agent.body.position;
        let velocity = agent.body.velocity;

        if velocity.length() < STANDSTILL {
            return Vec2::ZERO;
        }

        let forward = velocity.normalize_or_zero();
        let look_ahead = self.avoidance_distance;

        // The agent's own footprint widens the threat corridor.
        let safety_margin = agent
            .collider
            .and_then(|id| env.colliders.get(id))
            .map(|c| c.shape.approx_radius())
            .unwrap_or(10.0);

        let mut closest_distance = look_ahead;
        let mut closest_position = Vec2::ZERO;
        let mut obstacle_found = false;

        for collider in env.colliders.iter() {
            if Some(collider.id) == agent.collider {
                continue;
            }
            if self.ignore_agents_in_avoidance && collider.is_agent {
                continue;
            }

            let to_obstacle = collider.position() - position;

            // Project the obstacle onto the movement ray; ignore anything
            // behind us or past the look-ahead horizon.
            let projection = to_obstacle.dot(forward);
            if projection < 0.0 || projection > look_ahead {
                continue;
            }

            let point_on_ray = position + forward * projection;
            let distance_to_ray = collider.position().distance(point_on_ray);

            let threat_radius = collider.shape.approx_radius() + safety_margin;

            if distance_to_ray < threat_radius && projection < closest_distance {
                closest_distance = projection;
                closest_position = collider.position();
                obstacle_found = true;
            }
        }

        if !obstacle_found {
            return Vec2::ZERO;
        }

        let to_obstacle = closest_position - position;
        let right = Vec2::new(forward.y, -forward.x);
        let side = to_obstacle.dot(right);

        // Push away from whichever side the obstacle sits on.
        let avoidance_direction = if side < 0.0 { right } else { -right };

        let proximity = 1.0 - closest_distance / look_ahead;
        let magnitude = agent.speed * proximity * self.avoidance_force;

        avoidance_direction * magnitude * self.weight
    }

    fn path_following(&self, self_id: AgentId, env: &mut SteeringEnv) -> Vec2 {
        let (Some(agent), Some(target)) = (
            env.agents.get(self_id),
            self.target.and_then(|t| env.agents.get(t)),
        ) else {
            return Vec2::ZERO;
        };

        let agent_position = agent.body.position;
        let target_position = target.body.position;
        let speed = agent.speed;
        let velocity = agent.body.velocity;

        let path = env.map.path(agent_position, target_position, env.colliders);
        if path.len() < 2 {
            return Vec2::ZERO;
        }

        // Nearest point on the polyline, by segment projection.
        let mut nearest_point = agent_position;
        let mut nearest_segment = 0;
        let mut min_dist_sq = f32::MAX;

        for i in 0..path.len() - 1 {
            let candidate = closest_point_on_segment(agent_position, path[i], path[i + 1]);
            let dist_sq = candidate.distance_squared(agent_position);
            if dist_sq < min_dist_sq {
                min_dist_sq = dist_sq;
                nearest_point = candidate;
                nearest_segment = i;
            }
        }

        // Walk forward along the path by the look-ahead distance.
        let mut remaining = self.path_ahead_distance;
        let mut current_point = nearest_point;
        let mut segment = nearest_segment;

        while remaining > 0.0 {
            let segment_start = if segment == nearest_segment {
                current_point
            } else {
                path[segment]
            };
            let segment_end = if segment + 1 < path.len() {
                path[segment + 1]
            } else {
                segment_start
            };

            let segment_vec = segment_end - segment_start;
            let segment_len = segment_vec.length();

            if segment_len < 1e-4 {
                break;
            }

            if segment_len > remaining {
                current_point = segment_start + segment_vec / segment_len * remaining;
                break;
            }

            remaining -= segment_len;
            current_point = segment_end;

            segment += 1;
            if segment >= path.len() - 1 {
                break;
            }
        }

        let to_target = current_point - agent_position;
        if to_target.length() < 1e-3 {
            return Vec2::ZERO;
        }

        let mut desired = to_target.normalize_or_zero() * speed;

        // Slow down near the actual destination, not the look-ahead point.
        let distance_to_final = target_position.distance(agent_position);
        if distance_to_final < self.slowing_radius {
            desired *= distance_to_final / self.slowing_radius;
        }

        (desired - velocity) * self.weight
    }
}

/// Earliest positive interception time for the quadratic
/// `|to_target + rel_v * t| = chaser_speed * t`, falling back to a
/// distance-based or closest-approach estimate when no root fits.
fn intercept_time(to_target: Vec2, relative_velocity: Vec2, chaser_speed: f32, distance: f32) -> f32 {
    let a = relative_velocity.dot(relative_velocity) - chaser_speed * chaser_speed;
    let b = 2.0 * to_target.dot(relative_velocity);
    let c = to_target.dot(to_target);

    // Near-zero quadratic term: speeds are matched.
    if a.abs() < 1e-3 {
        return distance / chaser_speed;
    }

    let discriminant = b * b - 4.0 * a * c;

    if discriminant >= 0.0 {
        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            distance / chaser_speed
        }
    } else {
        // No interception possible; aim for the closest approach.
        (-b / (2.0 * a)).max(0.0)
    }
}

fn closest_point_on_segment(point: Vec2, line_start: Vec2, line_end: Vec2) -> Vec2 {
    let line = line_end - line_start;
    let line_length = line.length();

    if line_length < 1e-4 {
        return line_start;
    }

    let direction = line / line_length;
    let projection = (point - line_start).dot(direction);

    if projection <= 0.0 {
        return line_start;
    }
    if projection >= line_length {
        return line_end;
    }

    line_start + direction * projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::presets;
    use crate::system::AgentSystem;
    use collisions::prelude::*;
    use common::math::almost_equal_vec2;
    use nav::prelude::CollisionMap;

    struct World {
        system: AgentSystem,
        colliders: ColliderStore,
        map: CollisionMap,
    }

    impl World {
        fn new() -> Self {
            Self {
                system: AgentSystem::default(),
                colliders: ColliderStore::default(),
                map: CollisionMap::default(),
            }
        }

        fn spawn(&mut self, position: Vec2, speed: f32) -> AgentId {
            let mut agent = Agent::at(position);
            agent.speed = speed;
            self.system.register(agent)
        }

        /// Drains registration buffers without integrating anything.
        fn flush(&mut self) {
            self.system.tick(0.0, &self.colliders, &mut self.map);
        }

        fn run(&mut self, ctx: &mut SteeringContext, id: AgentId) -> Vec2 {
            let mut env = SteeringEnv {
                agents: &self.system,
                colliders: &self.colliders,
                map: &mut self.map,
            };
            ctx.execute(id, &mut env)
        }
    }

    #[test]
    fn seek_steers_at_full_speed_toward_target() {
        let mut world = World::new();
        let chaser = world.spawn(Vec2::ZERO, 100.0);
        let target = world.spawn(Vec2::new(100.0, 0.0), 100.0);
        world.flush();

        let mut ctx = presets::seek(target).build();
        let force = world.run(&mut ctx, chaser);

        assert!(almost_equal_vec2(force, Vec2::new(100.0, 0.0)), "{force:?}");
    }

    #[test]
    fn weight_scales_the_force_linearly() {
        let mut world = World::new();
        let chaser = world.spawn(Vec2::ZERO, 100.0);
        let target = world.spawn(Vec2::new(60.0, 80.0), 100.0);
        world.flush();

        let mut single = presets::seek(target).build();
        let mut double = presets::seek(target).weight(2.0).build();

        let f1 = world.run(&mut single, chaser);
        let f2 = world.run(&mut double, chaser);

        assert!(almost_equal_vec2(f2, f1 * 2.0));
    }

    #[test]
    fn radius_gate_cuts_far_targets() {
        let mut world = World::new();
        let chaser = world.spawn(Vec2::ZERO, 100.0);
        let target = world.spawn(Vec2::new(100.0, 0.0), 100.0);
        world.flush();

        for mut ctx in [
            presets::seek(target).radius(50.0).build(),
            presets::flee(target).radius(50.0).build(),
            presets::arrival(target).radius(50.0).build(),
            presets::pursuit(target).radius(50.0).build(),
            presets::evade(target).radius(50.0).build(),
        ] {
            assert_eq!(world.run(&mut ctx, chaser), Vec2::ZERO);
        }
    }

    #[test]
    fn view_angle_gate() {
        let mut world = World::new();
        let chaser = world.spawn(Vec2::ZERO, 100.0);
        // Off-axis target; the idle agent faces +X.
        let target = world.spawn(Vec2::new(0.0, 100.0), 100.0);
        world.flush();

        let mut narrow = presets::seek(target).view_angle(0.0).build();
        assert_eq!(world.run(&mut narrow, chaser), Vec2::ZERO);

        let mut blinkered = presets::seek(target).view_angle(90.0).build();
        assert_eq!(world.run(&mut blinkered, chaser), Vec2::ZERO);

        let mut full = presets::seek(target).view_angle(360.0).build();
        assert!(world.run(&mut full, chaser).length() > 0.0);
    }

    #[test]
    fn flee_points_away_from_the_threat() {
        let mut world = World::new();
        let runner = world.spawn(Vec2::ZERO, 100.0);
        let threat = world.spawn(Vec2::new(30.0, 0.0), 100.0);
        world.flush();

        let mut ctx = presets::flee(threat).build();
        let force = world.run(&mut ctx, runner);

        assert!(almost_equal_vec2(force, Vec2::new(-100.0, 0.0)), "{force:?}");
    }

    #[test]
    fn arrival_slows_inside_the_slowing_radius() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::ZERO, 100.0);
        let goal = world.spawn(Vec2::new(100.0, 0.0), 100.0);
        world.flush();

        let mut ctx = presets::arrival(goal).slowing_radius(200.0).build();
        let force = world.run(&mut ctx, mover);

        assert!(almost_equal_vec2(force, Vec2::new(50.0, 0.0)), "{force:?}");
    }

    #[test]
    fn arrival_stops_inside_tolerance() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::ZERO, 100.0);
        let goal = world.spawn(Vec2::new(3.0, 0.0), 100.0);
        world.flush();

        let mut ctx = presets::arrival(goal).arrival_tolerance(5.0).build();
        assert_eq!(world.run(&mut ctx, mover), Vec2::ZERO);
    }

    #[test]
    fn arrival_desired_speed_grows_with_distance() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::ZERO, 100.0);
        let goal = world.spawn(Vec2::new(10.0, 0.0), 100.0);
        world.flush();

        let mut previous = 0.0;
        for distance in [10.0, 50.0, 120.0, 200.0] {
            world.system.agent_mut(goal).unwrap().body.position = Vec2::new(distance, 0.0);
            let mut ctx = presets::arrival(goal).slowing_radius(200.0).build();
            let magnitude = world.run(&mut ctx, mover).length();
            assert!(magnitude >= previous, "not monotone at {distance}");
            previous = magnitude;
        }
    }

    #[test]
    fn pursuit_leads_a_crossing_target() {
        let mut world = World::new();
        let hunter = world.spawn(Vec2::ZERO, 10.0);
        let prey = world.spawn(Vec2::new(100.0, 0.0), 10.0);
        world.flush();
        world.system.agent_mut(prey).unwrap().body.velocity = Vec2::new(0.0, 10.0);

        let mut ctx = presets::pursuit(prey).max_prediction(5.0).build();
        let force = world.run(&mut ctx, hunter);

        // Speeds match, so prediction time hits the 5 s cap: the predicted
        // point is (100, 50) and the desired velocity points there.
        let expected = Vec2::new(100.0, 50.0).normalize() * 10.0;
        assert!(almost_equal_vec2(force, expected), "{force:?} vs {expected:?}");
    }

    #[test]
    fn evade_panics_when_the_threat_is_close() {
        let mut world = World::new();
        let runner = world.spawn(Vec2::ZERO, 100.0);
        let threat = world.spawn(Vec2::new(30.0, 0.0), 100.0);
        world.flush();

        let mut ctx = presets::evade(threat).build();
        let force = world.run(&mut ctx, runner);

        // Urgency at 30 units is 2 - 30/50 = 1.4.
        assert!(almost_equal_vec2(force, Vec2::new(-140.0, 0.0)), "{force:?}");
    }

    #[test]
    fn wander_is_reproducible_per_seed() {
        let mut world = World::new();
        let roamer = world.spawn(Vec2::ZERO, 100.0);
        world.flush();

        let mut a = presets::wander(42).build();
        let mut b = presets::wander(42).build();

        for _ in 0..16 {
            let fa = world.run(&mut a, roamer);
            let fb = world.run(&mut b, roamer);
            assert_eq!(fa, fb);
            assert!(fa.length() <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn separation_pushes_away_from_a_close_neighbor() {
        let mut world = World::new();
        let boid = world.spawn(Vec2::ZERO, 100.0);
        let _crowd = world.spawn(Vec2::new(10.0, 0.0), 100.0);
        world.flush();

        let mut ctx = presets::separation().separation_radius(25.0).build();
        let force = world.run(&mut ctx, boid);

        assert!(almost_equal_vec2(force, Vec2::new(-100.0, 0.0)), "{force:?}");
    }

    #[test]
    fn alignment_matches_neighbor_heading() {
        let mut world = World::new();
        let boid = world.spawn(Vec2::ZERO, 100.0);
        let neighbor = world.spawn(Vec2::new(20.0, 0.0), 100.0);
        world.flush();
        world.system.agent_mut(neighbor).unwrap().body.velocity = Vec2::new(0.0, 50.0);

        let mut ctx = presets::alignment().alignment_radius(50.0).build();
        let force = world.run(&mut ctx, boid);

        assert!(almost_equal_vec2(force, Vec2::new(0.0, 100.0)), "{force:?}");
    }

    #[test]
    fn cohesion_pulls_toward_the_group_center() {
        let mut world = World::new();
        let boid = world.spawn(Vec2::ZERO, 100.0);
        let _left = world.spawn(Vec2::new(30.0, 30.0), 100.0);
        let _right = world.spawn(Vec2::new(30.0, -30.0), 100.0);
        world.flush();

        let mut ctx = presets::cohesion().cohesion_radius(75.0).build();
        let force = world.run(&mut ctx, boid);

        // Center of mass is (30, 0), straight ahead.
        assert!(almost_equal_vec2(force, Vec2::new(100.0, 0.0)), "{force:?}");
    }

    #[test]
    fn flocking_ignores_agents_outside_radius() {
        let mut world = World::new();
        let boid = world.spawn(Vec2::ZERO, 100.0);
        let _far = world.spawn(Vec2::new(500.0, 0.0), 100.0);
        world.flush();

        for mut ctx in [
            presets::separation().build(),
            presets::alignment().build(),
            presets::cohesion().build(),
        ] {
            assert_eq!(world.run(&mut ctx, boid), Vec2::ZERO);
        }
    }

    #[test]
    fn obstacle_avoidance_steers_laterally() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::ZERO, 100.0);
        world.flush();
        world.system.agent_mut(mover).unwrap().body.velocity = Vec2::new(50.0, 0.0);

        let mut rock = Collider::new(ColliderShapeType::Circle { radius: 10.0 }, None);
        rock.set_position(Vec2::new(40.0, 0.0));
        world.colliders.register(rock);

        let mut ctx = presets::obstacle_avoidance()
            .avoidance_distance(60.0)
            .avoidance_force(1.0)
            .build();
        let force = world.run(&mut ctx, mover);

        // Perpendicular to the movement ray, with the dead-center obstacle
        // breaking toward +Y, magnitude speed * (1 - 40/60).
        assert!(force.x.abs() < 1e-4, "{force:?}");
        assert!((force.y - 100.0 / 3.0).abs() < 1e-3, "{force:?}");
    }

    #[test]
    fn obstacle_avoidance_ignores_agents_when_asked() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::ZERO, 100.0);
        world.flush();
        world.system.agent_mut(mover).unwrap().body.velocity = Vec2::new(50.0, 0.0);

        let mut body = Collider::new(ColliderShapeType::Circle { radius: 10.0 }, None);
        body.set_position(Vec2::new(40.0, 0.0));
        let id = world.colliders.register(body);
        world.colliders.mark_agent(id, true);

        let mut ignoring = presets::obstacle_avoidance().build();
        assert_eq!(world.run(&mut ignoring, mover), Vec2::ZERO);

        let mut wary = presets::obstacle_avoidance()
            .ignore_agents_in_avoidance(false)
            .build();
        assert!(world.run(&mut wary, mover).length() > 0.0);
    }

    #[test]
    fn avoidance_when_still_is_zero() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::ZERO, 100.0);
        world.flush();

        let mut rock = Collider::new(ColliderShapeType::Circle { radius: 10.0 }, None);
        rock.set_position(Vec2::new(20.0, 0.0));
        world.colliders.register(rock);

        let mut ctx = presets::obstacle_avoidance().build();
        assert_eq!(world.run(&mut ctx, mover), Vec2::ZERO);
    }

    #[test]
    fn path_following_needs_at_least_two_waypoints() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::new(5.0, 5.0), 100.0);
        // Same tile as the mover: the path degenerates to one waypoint.
        let goal = world.spawn(Vec2::new(5.2, 5.2), 100.0);
        world.flush();

        let mut ctx = presets::path_following(goal).build();
        assert_eq!(world.run(&mut ctx, mover), Vec2::ZERO);
    }

    #[test]
    fn path_following_heads_along_the_route() {
        let mut world = World::new();
        let mover = world.spawn(Vec2::new(5.0, 5.0), 100.0);
        let goal = world.spawn(Vec2::new(80.0, 5.0), 100.0);
        world.flush();

        let mut ctx = presets::path_following(goal).build();
        let force = world.run(&mut ctx, mover);

        // Open default grid: the route runs straight along +X, modulo the
        // half-cell offset of tile centers.
        assert!(force.x > 0.0, "{force:?}");
        assert!(force.y.abs() < 0.05 * force.x, "{force:?}");
    }

    #[test]
    fn dead_targets_contribute_nothing() {
        let mut world = World::new();
        let chaser = world.spawn(Vec2::ZERO, 100.0);
        world.flush();

        let ghost = AgentId(9999);
        for mut ctx in [
            presets::seek(ghost).build(),
            presets::flee(ghost).build(),
            presets::arrival(ghost).build(),
            presets::pursuit(ghost).build(),
            presets::evade(ghost).build(),
            presets::path_following(ghost).build(),
        ] {
            assert_eq!(world.run(&mut ctx, chaser), Vec2::ZERO);
        }
    }
}
