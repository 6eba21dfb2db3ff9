//! World-space front end of the pathfinder.
//!
//! `CollisionMap` derives a tile grid from the scene's static colliders: the
//! smallest collider dictates the cell size, the union of collider AABBs
//! dictates the world window, and every non-agent collider AABB is
//! rasterized into blocked tiles. Queries and results are in world
//! coordinates; the grid searcher only ever sees tile indices.

use bevy::prelude::*;
use collisions::prelude::*;
use common::math::floor_to_int;
use common::FRect;

use crate::astar::{GridPathfinder, Tile};
use crate::NavError;

/// Last computed path plus the grid metadata needed to visualize it.
#[derive(Debug, Default, Clone)]
pub struct DebugPath {
    pub points: Vec<Vec2>,
    pub grid_width: i32,
    pub grid_height: i32,
    pub cell_size: f32,
    pub origin: Vec2,
}

#[derive(Resource)]
pub struct CollisionMap {
    accuracy: f32,
    smallest_entity_size: f32,
    world_start: Vec2,
    world_end: Vec2,
    grid_width: i32,
    grid_height: i32,
    pathfinder: Option<GridPathfinder>,
    dirty: bool,
    debug_path: DebugPath,
}

impl Default for CollisionMap {
    fn default() -> Self {
        Self {
            accuracy: 1.0,
            smallest_entity_size: 1.0,
            world_start: Vec2::ZERO,
            world_end: Vec2::new(100.0, 100.0),
            grid_width: 100,
            grid_height: 100,
            pathfinder: None,
            dirty: true,
            debug_path: DebugPath::default(),
        }
    }
}

impl CollisionMap {
    /// Subdivision factor: tiles per smallest collider extent. Higher values
    /// give finer grids (and more expensive searches).
    pub fn set_accuracy(&mut self, accuracy: f32) {
        self.accuracy = accuracy.max(1.0);
        self.dirty = true;
    }

    /// Marks the derived grid stale; the next query rebuilds it. Call after
    /// moving or spawning static geometry.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn cell_size(&self) -> f32 {
        self.smallest_entity_size / self.accuracy
    }

    pub fn grid_width(&self) -> i32 {
        self.grid_width
    }

    pub fn grid_height(&self) -> i32 {
        self.grid_height
    }

    pub fn world_start(&self) -> Vec2 {
        self.world_start
    }

    pub fn debug_path(&self) -> &DebugPath {
        &self.debug_path
    }

    /// Whether the given tile is covered by a rasterized collider. Tiles
    /// outside the grid count as blocked.
    pub fn tile_blocked(&self, x: i32, y: i32) -> bool {
        self.pathfinder
            .as_ref()
            .map(|finder| finder.is_blocked(x, y))
            .unwrap_or(true)
    }

    pub fn world_to_tile(&self, point: Vec2) -> (i32, i32) {
        let cell_size = self.cell_size();
        let x = floor_to_int((point.x - self.world_start.x) / cell_size);
        let y = floor_to_int((point.y - self.world_start.y) / cell_size);

        (
            x.clamp(0, (self.grid_width - 1).max(0)),
            y.clamp(0, (self.grid_height - 1).max(0)),
        )
    }

    /// Center of the tile in world space.
    pub fn tile_to_world(&self, tile: (i32, i32)) -> Vec2 {
        let cell_size = self.cell_size();
        Vec2::new(
            tile.0 as f32 * cell_size + self.world_start.x + cell_size * 0.5,
            tile.1 as f32 * cell_size + self.world_start.y + cell_size * 0.5,
        )
    }

    /// Computes world-space waypoints from `start` to `end`, rebuilding the
    /// grid first when stale. Empty result means no path (blocked or
    /// unreachable goal) — callers treat that as "no contribution".
    pub fn path(&mut self, start: Vec2, end: Vec2, colliders: &ColliderStore) -> Vec<Vec2> {
        if self.dirty {
            if let Err(err) = self.refresh(colliders) {
                error!("collision map rebuild failed: {err}");
                return Vec::new();
            }
        }

        let (sx, sy) = self.world_to_tile(start);
        let (ex, ey) = self.world_to_tile(end);

        let cells = match self.pathfinder.as_mut() {
            Some(finder) => finder.new_path(sx, sy, ex, ey),
            None => return Vec::new(),
        };

        let points: Vec<Vec2> = cells
            .iter()
            .map(|cell| self.tile_to_world(*cell))
            .collect();

        self.debug_path = DebugPath {
            points: points.clone(),
            grid_width: self.grid_width,
            grid_height: self.grid_height,
            cell_size: self.cell_size(),
            origin: self.world_start,
        };

        points
    }

    /// Re-derives extents and tile data from the collider set and rebuilds
    /// the pathfinder. Agent-carrying colliders contribute to the extents but
    /// are never rasterized as obstacles.
    pub fn refresh(&mut self, colliders: &ColliderStore) -> Result<(), NavError> {
        self.find_map_data(colliders);

        let cell_size = self.cell_size();
        if cell_size <= 0.0 {
            return Err(NavError::InvalidCellSize(cell_size));
        }

        let tiles = self.rasterize(colliders, cell_size);

        let mut finder = GridPathfinder::new(self.grid_width, self.grid_height, 1, 1);
        finder.set_tile_map(tiles);
        self.pathfinder = Some(finder);
        self.dirty = false;

        info!(
            "collision map rebuilt: {}x{} tiles, cell size {}",
            self.grid_width, self.grid_height, cell_size
        );

        Ok(())
    }

    fn find_map_data(&mut self, colliders: &ColliderStore) {
        let mut smallest = f32::MAX;
        let mut window: Option<FRect> = None;

        for collider in colliders.iter() {
            let extent = collider.shape.min_extent();
            if extent <= 0.0 {
                continue;
            }

            smallest = smallest.min(extent);

            let bounds = collider.bounds();
            window = Some(match window {
                Some(w) => w.union(&bounds),
                None => bounds,
            });
        }

        let Some(window) = window else {
            return;
        };

        self.smallest_entity_size = smallest.max(1.0);
        self.world_start = window.location();
        self.world_end = window.location() + window.size();

        let delta = (self.world_end - self.world_start).abs();
        let cell_size = self.cell_size();
        self.grid_width = (delta.x / cell_size).ceil() as i32;
        self.grid_height = (delta.y / cell_size).ceil() as i32;
    }

    fn rasterize(&self, colliders: &ColliderStore, cell_size: f32) -> Vec<Tile> {
        let mut tiles = vec![Tile::default(); (self.grid_width * self.grid_height) as usize];

        for collider in colliders.iter() {
            if collider.is_agent {
                continue;
            }
            if collider.shape.min_extent() <= 0.0 {
                continue;
            }

            let bounds = collider.bounds();
            let start_x = floor_to_int((bounds.left() - self.world_start.x) / cell_size)
                .clamp(0, self.grid_width - 1);
            let start_y = floor_to_int((bounds.top() - self.world_start.y) / cell_size)
                .clamp(0, self.grid_height - 1);
            let end_x = floor_to_int((bounds.right() - self.world_start.x) / cell_size)
                .clamp(0, self.grid_width - 1);
            let end_y = floor_to_int((bounds.bottom() - self.world_start.y) / cell_size)
                .clamp(0, self.grid_height - 1);

            for y in start_y..=end_y {
                for x in start_x..=end_x {
                    tiles[(y * self.grid_width + x) as usize].blocked = true;
                }
            }
        }

        tiles
    }
}
