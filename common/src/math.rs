use bevy::prelude::*;

/// Clamps the length of `vec2` to `max`, preserving direction.
pub fn truncate_vec2(vec2: Vec2, max: f32) -> Vec2 {
    if vec2.length() > max {
        let vec2 = vec2.normalize_or_zero();
        return vec2 * max;
    }

    vec2
}

pub fn floor_to_int(f: f32) -> i32 {
    (f as f64).floor() as i32
}

pub fn almost_equal_f32(x: f32, y: f32) -> bool {
    (x - y).abs() <= 1e-4 * (x.abs() + y.abs()).max(1.0)
}

pub fn almost_equal_vec2(left: Vec2, right: Vec2) -> bool {
    almost_equal_f32(left.x, right.x) && almost_equal_f32(left.y, right.y)
}
