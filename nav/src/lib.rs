use thiserror::Error;

pub mod astar;
pub mod collision_map;
pub mod plugin;
pub mod prelude;

#[derive(Debug, Error)]
pub enum NavError {
    /// Cell size is derived from the smallest collider divided by the
    /// configured accuracy; a non-positive value means the collider set or
    /// the accuracy setting is corrupt.
    #[error("collision map cell size must be positive, got {0}")]
    InvalidCellSize(f32),
}
