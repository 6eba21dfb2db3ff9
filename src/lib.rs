//! 2D autonomous movement for Bevy games.
//!
//! A steering core in three layers: a buffered agent registry ticked once per
//! frame ([`movement`]), a library of Reynolds-style steering behaviors
//! (seek/flee/arrival, pursuit/evade, wander, flocking, obstacle avoidance,
//! path following) driven by per-context parameter records, and a grid A*
//! pathfinder rasterized from the scene's static colliders ([`nav`]).
//!
//! Add [`SteeringAiPlugin`] to wire everything up:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use steering_ai::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(SteeringAiPlugin)
//!     .run();
//! ```

use bevy::prelude::*;

pub use collisions;
pub use common;
pub use movement;
pub use nav;

pub mod prelude {
    pub use crate::SteeringAiPlugin;
    pub use collisions::prelude::*;
    pub use common::{FRect, Position};
    pub use movement::prelude::*;
    pub use nav::prelude::*;
}

use collisions::prelude::CollisionPlugin;
use movement::prelude::SteeringPlugin;
use nav::prelude::NavPlugin;

/// Collider store + collision map + steering system, in one plugin.
pub struct SteeringAiPlugin;

impl Plugin for SteeringAiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CollisionPlugin, NavPlugin, SteeringPlugin));
    }
}
