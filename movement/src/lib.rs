//! Autonomous movement: steering agents, behavior contexts and the per-frame
//! tick that folds behavior forces into agent motion.

use bevy::prelude::*;

pub mod agent;
pub mod behaviors;
pub mod context;
pub mod plugin;
pub mod prelude;
pub mod presets;
pub mod system;

/// Stable handle to a registered agent.
///
/// Handed out by the [`system::AgentSystem`] and never reused, so behaviors
/// holding a target id of a destroyed agent simply resolve nothing and
/// contribute zero force.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}
