pub use crate::astar::{phyt, GridPathfinder, Tile};
pub use crate::collision_map::{CollisionMap, DebugPath};
pub use crate::plugin::NavPlugin;
pub use crate::NavError;
