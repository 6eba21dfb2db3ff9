use bevy::prelude::*;

use crate::collision_map::CollisionMap;

pub struct NavPlugin;

impl Plugin for NavPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionMap>();
        app.add_systems(Update, draw_debug_path);
    }
}

/// Draws the most recent path over the world. Purely diagnostic; steering
/// never reads anything back from here.
fn draw_debug_path(map: Res<CollisionMap>, mut gizmos: Gizmos) {
    let debug = map.debug_path();
    if debug.points.len() < 2 {
        return;
    }

    gizmos.linestrip_2d(debug.points.iter().copied(), Color::srgba(0.2, 0.9, 0.2, 1.0));
    for point in &debug.points {
        gizmos.circle_2d(*point, debug.cell_size * 0.2, Color::srgba(0.2, 0.9, 0.2, 1.0));
    }
}
