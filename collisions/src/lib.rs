use bevy::prelude::*;

pub mod colliders;
pub mod plugin;
pub mod prelude;
pub mod shapes;
pub mod store;

/// Stable handle to a registered collider.
///
/// Ids are handed out by a monotonically increasing counter and never reused,
/// so a stale id resolves to `None` instead of aliasing a newer collider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct ColliderId(pub u32);

impl std::fmt::Display for ColliderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "collider#{}", self.0)
    }
}
